//! In-memory ledger implementation for testing

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

#[derive(Debug, Default)]
struct LedgerState {
    bills: Vec<ServiceBill>,
    vendors: Vec<String>,
    next_id: u64,
    session: Option<String>,
    sessions_opened: usize,
    sessions_closed: usize,
    bill_submissions: usize,
    fail_reads: bool,
    fail_close: bool,
    rejected_references: HashSet<String>,
    rejected_vendors: HashSet<String>,
}

impl LedgerState {
    fn issue_id(&mut self) -> String {
        self.next_id += 1;
        format!("TXN-{}", self.next_id)
    }

    fn require_session(&self) -> LedgerResult<()> {
        if self.session.is_none() {
            return Err(LedgerError::Session("No open session".to_string()));
        }
        Ok(())
    }

    fn has_vendor(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.vendors.iter().any(|v| v.to_lowercase() == wanted)
    }
}

/// In-memory ledger for testing and development
///
/// Clones share state, so a test can keep one handle for inspection and
/// fault injection while another is owned by the code under test.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl MemoryLedger {
    /// Create a new, empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed a bill as if it had been stored earlier, registering its vendor
    ///
    /// Bills without an id get one issued.
    pub fn insert_bill(&self, mut bill: ServiceBill) -> LedgerResult<()> {
        let mut state = self.write();
        if !bill.has_id() {
            bill.id = state.issue_id();
        } else if state.bills.iter().any(|b| b.id == bill.id) {
            return Err(LedgerError::Storage(format!(
                "Bill with id '{}' already exists",
                bill.id
            )));
        }

        if !state.has_vendor(&bill.vendor_name) {
            state.vendors.push(bill.vendor_name.clone());
        }
        state.bills.push(bill);
        Ok(())
    }

    /// Seed a vendor
    pub fn add_vendor(&self, name: impl Into<String>) {
        let name = name.into();
        let mut state = self.write();
        if !state.has_vendor(&name) {
            state.vendors.push(name);
        }
    }

    /// Make every read fail until switched off again
    pub fn fail_reads(&self, fail: bool) {
        self.write().fail_reads = fail;
    }

    /// Make closing a session fail
    pub fn fail_session_close(&self, fail: bool) {
        self.write().fail_close = fail;
    }

    /// Refuse bills carrying this reference number
    pub fn reject_bill(&self, reference_number: &str) {
        self.write()
            .rejected_references
            .insert(reference_number.to_lowercase());
    }

    /// Refuse to create a vendor with this name
    pub fn reject_vendor(&self, name: &str) {
        self.write().rejected_vendors.insert(name.to_lowercase());
    }

    /// Copy of every stored bill
    pub fn bills(&self) -> Vec<ServiceBill> {
        self.read().bills.clone()
    }

    /// Copy of every stored vendor name
    pub fn vendors(&self) -> Vec<String> {
        self.read().vendors.clone()
    }

    /// Number of bill creation commands received, accepted or not
    pub fn bill_submissions(&self) -> usize {
        self.read().bill_submissions
    }

    pub fn sessions_opened(&self) -> usize {
        self.read().sessions_opened
    }

    pub fn sessions_closed(&self) -> usize {
        self.read().sessions_closed
    }

    /// Application name of the open session, if any
    pub fn session_app_name(&self) -> Option<String> {
        self.read().session.clone()
    }
}

#[async_trait]
impl BillReader for MemoryLedger {
    async fn fetch_all_bills(&self) -> LedgerResult<Vec<ServiceBill>> {
        let state = self.read();
        if state.fail_reads {
            return Err(LedgerError::Read("ledger unavailable".to_string()));
        }
        Ok(state.bills.clone())
    }
}

#[async_trait]
impl BillLedger for MemoryLedger {
    async fn open_session(&mut self, app_name: &str) -> LedgerResult<()> {
        let mut state = self.write();
        if state.session.is_some() {
            return Err(LedgerError::Session("Session already open".to_string()));
        }
        state.session = Some(app_name.to_string());
        state.sessions_opened += 1;
        Ok(())
    }

    async fn close_session(&mut self) -> LedgerResult<()> {
        let mut state = self.write();
        state.require_session()?;
        state.session = None;
        state.sessions_closed += 1;
        if state.fail_close {
            return Err(LedgerError::Session(
                "Connection dropped while closing".to_string(),
            ));
        }
        Ok(())
    }

    async fn list_vendor_names(&self) -> LedgerResult<Vec<String>> {
        Ok(self.read().vendors.clone())
    }

    async fn create_vendor(&mut self, name: &str) -> LedgerResult<CommandStatus> {
        let mut state = self.write();
        state.require_session()?;

        if state.rejected_vendors.contains(&name.to_lowercase()) {
            return Ok(CommandStatus::rejected(
                3100,
                format!("The name \"{}\" of the list element is already in use.", name),
            ));
        }

        if !state.has_vendor(name) {
            state.vendors.push(name.to_string());
        }
        Ok(CommandStatus::ok())
    }

    async fn create_bill(&mut self, bill: &ServiceBill) -> LedgerResult<BillAddReply> {
        let mut state = self.write();
        state.require_session()?;
        state.bill_submissions += 1;

        if state
            .rejected_references
            .contains(&bill.reference_number.to_lowercase())
        {
            return Ok(BillAddReply {
                txn_id: None,
                status: CommandStatus::rejected(3180, "There was an error when saving a Bill."),
            });
        }

        if !state.has_vendor(&bill.vendor_name) {
            return Ok(BillAddReply {
                txn_id: None,
                status: CommandStatus::rejected(
                    3140,
                    format!("There is an invalid reference to vendor \"{}\".", bill.vendor_name),
                ),
            });
        }

        let id = state.issue_id();
        state.bills.push(ServiceBill {
            id: id.clone(),
            ..bill.clone()
        });

        Ok(BillAddReply {
            txn_id: Some(id),
            status: CommandStatus::ok(),
        })
    }
}
