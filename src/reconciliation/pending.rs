//! Memory of bills classified as added but not yet visible in the ledger

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::types::*;

/// Bills the engine has classified as `Added` in earlier passes
///
/// Cloning the store yields another handle onto the same entries, so a
/// caller can hand one handle to an engine and keep one for inspection.
/// Passes sharing a store must not run concurrently.
#[derive(Debug, Clone, Default)]
pub struct PendingCreations {
    bills: Arc<RwLock<Vec<ServiceBill>>>,
}

impl PendingCreations {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a copy of a bill that has just been classified as added
    pub fn remember(&self, bill: ServiceBill) -> LedgerResult<()> {
        self.bills
            .write()
            .map_err(|_| poisoned())?
            .push(bill);
        Ok(())
    }

    /// Copy of every remembered bill, in the order they were added
    pub fn snapshot(&self) -> LedgerResult<Vec<ServiceBill>> {
        Ok(self.bills.read().map_err(|_| poisoned())?.clone())
    }

    /// Drop entries whose key the ledger now reports and return the rest
    pub fn retain_unseen(&self, seen: &HashSet<BillKey>) -> LedgerResult<Vec<ServiceBill>> {
        let mut bills = self.bills.write().map_err(|_| poisoned())?;
        bills.retain(|bill| !seen.contains(&bill.key()));
        Ok(bills.clone())
    }

    pub fn len(&self) -> usize {
        self.bills.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every remembered bill
    pub fn clear(&self) -> LedgerResult<()> {
        self.bills.write().map_err(|_| poisoned())?.clear();
        Ok(())
    }
}

fn poisoned() -> LedgerError {
    LedgerError::Storage("pending creation store lock poisoned".to_string())
}
