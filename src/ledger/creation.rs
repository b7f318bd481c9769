//! Duplicate-safe creation of bills in the ledger

use std::collections::HashSet;

use tracing::{error, info, warn};

use super::vendor::ensure_vendor;
use crate::config::SyncConfig;
use crate::traits::*;
use crate::types::*;

/// Submits bills to the ledger, skipping any whose key already exists
pub struct BillCreationService<L: BillLedger> {
    ledger: L,
    config: SyncConfig,
    validator: Box<dyn BillValidator>,
}

impl<L: BillLedger> BillCreationService<L> {
    /// Create a new creation service
    pub fn new(ledger: L) -> Self {
        Self::with_config(ledger, SyncConfig::default())
    }

    /// Create a new creation service with custom settings
    pub fn with_config(ledger: L, config: SyncConfig) -> Self {
        Self {
            ledger,
            config,
            validator: Box::new(DefaultBillValidator),
        }
    }

    /// Create a new creation service with a custom validator
    pub fn with_validator(ledger: L, validator: Box<dyn BillValidator>) -> Self {
        Self {
            ledger,
            config: SyncConfig::default(),
            validator,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Create every bill whose key is not yet in the ledger
    ///
    /// The whole batch runs inside one ledger session. The returned results
    /// are parallel to `bills`. A rejected bill does not stop the batch; a
    /// vendor that cannot be created, or a failing ledger call, stops it and
    /// leaves the remaining bills [`CreationOutcome::NotProcessed`].
    pub async fn create_bills(&mut self, bills: &[ServiceBill]) -> Vec<CreationResult> {
        let mut results: Vec<CreationResult> = bills
            .iter()
            .cloned()
            .map(|bill| CreationResult {
                bill,
                outcome: CreationOutcome::NotProcessed,
            })
            .collect();

        if let Err(e) = self.ledger.open_session(&self.config.app_name).await {
            error!("Could not open ledger session: {}", e);
            return results;
        }

        if let Err(e) = self.process_batch(&mut results).await {
            error!("Unhandled error during bill creation: {}", e);
        }

        if let Err(e) = self.ledger.close_session().await {
            warn!("Error while closing ledger session: {}", e);
        }

        results
    }

    async fn process_batch(&mut self, results: &mut [CreationResult]) -> LedgerResult<()> {
        let existing = self.ledger.fetch_all_bills().await?;
        let mut existing_keys: HashSet<BillKey> = existing.iter().map(ServiceBill::key).collect();

        for result in results.iter_mut() {
            let key = result.bill.key();

            if existing_keys.contains(&key) {
                warn!(
                    "Skipped: Bill already exists for '{}' with reference '{}'.",
                    result.bill.vendor_name, result.bill.reference_number
                );
                result.outcome = CreationOutcome::SkippedDuplicate;
                continue;
            }

            if let Err(e) = self.validator.validate_bill(&result.bill) {
                warn!(
                    "Skipped invalid bill for '{}' with reference '{}': {}",
                    result.bill.vendor_name, result.bill.reference_number, e
                );
                result.outcome = CreationOutcome::Invalid {
                    message: e.to_string(),
                };
                continue;
            }

            ensure_vendor(&mut self.ledger, &result.bill.vendor_name).await?;

            let reply = self.ledger.create_bill(&result.bill).await?;
            if !reply.status.is_ok() {
                warn!(
                    "Failed to add bill for '{}': {}",
                    result.bill.vendor_name, reply.status.message
                );
                result.outcome = CreationOutcome::Rejected {
                    message: reply.status.message,
                };
                continue;
            }

            let id = reply.txn_id.unwrap_or_default();
            info!(
                "Bill added for '{}' | TxnID: {}",
                result.bill.vendor_name, id
            );
            result.bill.id = id.clone();
            result.outcome = CreationOutcome::Created { id };
            existing_keys.insert(key);
        }

        Ok(())
    }
}
