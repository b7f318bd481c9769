//! Key-based reconciliation of local bills against the ledger snapshot

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::equivalence::bills_equivalent;
use super::pending::PendingCreations;
use crate::config::SyncConfig;
use crate::traits::*;
use crate::types::*;
use crate::utils::ensure_unique_keys;

/// Where a reference bill came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Ledger,
    Pending,
}

struct ReferenceBill {
    bill: ServiceBill,
    origin: Origin,
}

/// Number of bills per status after a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub unchanged: usize,
    pub different: usize,
    pub added: usize,
    pub missing: usize,
}

impl ReconciliationSummary {
    pub fn from_results(results: &[ReconciledBill]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result.status {
                BillStatus::Unchanged => summary.unchanged += 1,
                BillStatus::Different => summary.different += 1,
                BillStatus::Added => summary.added += 1,
                BillStatus::Missing => summary.missing += 1,
                BillStatus::Unknown | BillStatus::FailedToAdd => {}
            }
        }
        summary
    }

    /// True when local and ledger bills already agree
    pub fn is_in_sync(&self) -> bool {
        self.different == 0 && self.added == 0 && self.missing == 0
    }
}

/// Compares local bills with the ledger and classifies each one
///
/// Bills classified as [`BillStatus::Added`] are remembered in a
/// [`PendingCreations`] store so that repeated passes over the same
/// local bills hand out the same placeholder ids until the ledger itself
/// reports the bill.
pub struct ReconciliationEngine<R: BillReader> {
    reader: R,
    config: SyncConfig,
    pending: PendingCreations,
}

impl<R: BillReader> ReconciliationEngine<R> {
    /// Create an engine with default settings and an empty pending store
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, SyncConfig::default())
    }

    /// Create an engine with custom settings
    pub fn with_config(reader: R, config: SyncConfig) -> Self {
        Self {
            reader,
            config,
            pending: PendingCreations::new(),
        }
    }

    /// Use an existing pending store, e.g. one shared with a previous engine
    pub fn with_pending(mut self, pending: PendingCreations) -> Self {
        self.pending = pending;
        self
    }

    pub fn pending(&self) -> &PendingCreations {
        &self.pending
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Reconcile `candidates` against the current ledger snapshot
    ///
    /// Returns every candidate in input order with its status, followed by
    /// the reference bills no candidate matched, marked `Missing`.
    pub async fn reconcile(
        &self,
        candidates: &[ServiceBill],
    ) -> LedgerResult<Vec<ReconciledBill>> {
        info!("ServiceBillComparator Initialized");

        ensure_unique_keys(candidates)?;

        let ledger_bills = self.reader.fetch_all_bills().await.map_err(|e| {
            error!("Error while querying service bills from the ledger: {}", e);
            e
        })?;

        let references = self.reference_snapshot(ledger_bills)?;

        let mut lookup: HashMap<BillKey, usize> = HashMap::with_capacity(references.len());
        for (index, reference) in references.iter().enumerate() {
            match lookup.entry(reference.bill.key()) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
                Entry::Occupied(slot) => {
                    warn!(
                        "Ledger holds more than one bill for {}, using the first one",
                        slot.key()
                    );
                }
            }
        }

        let candidate_keys: HashSet<BillKey> = candidates.iter().map(ServiceBill::key).collect();
        let mut results = Vec::with_capacity(candidates.len() + references.len());

        for candidate in candidates {
            let mut bill = candidate.clone();

            let status = match lookup.get(&bill.key()) {
                None => {
                    bill.id = self.synthesize_id();
                    self.pending.remember(bill.clone())?;
                    BillStatus::Added
                }
                Some(&index) => {
                    let reference = &references[index];
                    bill.id = reference.bill.id.clone();

                    let equivalent =
                        bills_equivalent(&reference.bill, &bill, &self.config.amount_tolerance);
                    match (reference.origin, equivalent) {
                        (_, false) => BillStatus::Different,
                        (Origin::Ledger, true) => BillStatus::Unchanged,
                        (Origin::Pending, true) => BillStatus::Added,
                    }
                }
            };

            info!("ServiceBill {} is {}.", bill.reference_number, status);
            results.push(ReconciledBill::new(bill, status));
        }

        for reference in references {
            if candidate_keys.contains(&reference.bill.key()) {
                continue;
            }

            info!(
                "ServiceBill {} is {}.",
                reference.bill.reference_number,
                BillStatus::Missing
            );
            results.push(ReconciledBill::new(reference.bill, BillStatus::Missing));
        }

        info!("ServiceBillComparator Completed");
        Ok(results)
    }

    /// Ledger bills followed by pending bills the ledger does not report yet
    fn reference_snapshot(
        &self,
        ledger_bills: Vec<ServiceBill>,
    ) -> LedgerResult<Vec<ReferenceBill>> {
        let ledger_keys: HashSet<BillKey> = ledger_bills.iter().map(ServiceBill::key).collect();
        let pending = self.pending.retain_unseen(&ledger_keys)?;

        debug!(
            ledger = ledger_bills.len(),
            pending = pending.len(),
            "Built reference snapshot"
        );

        Ok(ledger_bills
            .into_iter()
            .map(|bill| ReferenceBill {
                bill,
                origin: Origin::Ledger,
            })
            .chain(pending.into_iter().map(|bill| ReferenceBill {
                bill,
                origin: Origin::Pending,
            }))
            .collect())
    }

    fn synthesize_id(&self) -> String {
        let token = Uuid::new_v4().simple().to_string();
        format!("{}{}", self.config.synthetic_id_prefix, &token[..8])
    }
}
