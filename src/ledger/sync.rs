//! Orchestrator tying reconciliation and bill creation to one ledger

use tracing::info;

use crate::config::SyncConfig;
use crate::ledger::BillCreationService;
use crate::reconciliation::{PendingCreations, ReconciliationEngine};
use crate::traits::*;
use crate::types::*;

/// Reconciles local bills against a ledger and pushes the new ones into it
pub struct BillSync<L: BillLedger + Clone> {
    engine: ReconciliationEngine<L>,
    creator: BillCreationService<L>,
}

impl<L: BillLedger + Clone> BillSync<L> {
    /// Create a new synchronizer with default settings
    pub fn new(ledger: L) -> Self {
        Self::with_config(ledger, SyncConfig::default())
    }

    /// Create a new synchronizer with custom settings
    pub fn with_config(ledger: L, config: SyncConfig) -> Self {
        Self {
            engine: ReconciliationEngine::with_config(ledger.clone(), config.clone()),
            creator: BillCreationService::with_config(ledger, config),
        }
    }

    /// Bills classified as added and not yet reported by the ledger
    pub fn pending(&self) -> &PendingCreations {
        self.engine.pending()
    }

    /// Classify local bills against the ledger
    pub async fn reconcile(
        &self,
        candidates: &[ServiceBill],
    ) -> LedgerResult<Vec<ReconciledBill>> {
        self.engine.reconcile(candidates).await
    }

    /// Create bills directly, see [`BillCreationService::create_bills`]
    pub async fn create_bills(&mut self, bills: &[ServiceBill]) -> Vec<CreationResult> {
        self.creator.create_bills(bills).await
    }

    /// Create the bills a reconciliation pass classified as added
    ///
    /// Placeholder ids are cleared before submission so the ledger issues
    /// real ones. Other statuses are left alone; updating `Different` bills
    /// is up to the caller.
    pub async fn create_added(&mut self, reconciled: &[ReconciledBill]) -> Vec<CreationResult> {
        let to_create: Vec<ServiceBill> = reconciled
            .iter()
            .filter(|r| r.status == BillStatus::Added)
            .map(|r| ServiceBill {
                id: String::new(),
                ..r.bill.clone()
            })
            .collect();

        info!("Submitting {} added bill(s) to the ledger", to_create.len());
        self.creator.create_bills(&to_create).await
    }
}
