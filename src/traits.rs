//! Traits for ledger abstraction and extensibility

use async_trait::async_trait;

use crate::types::*;

/// Read access to the bills held by the ledger
///
/// Implementations return the complete bill list with ids, vendor names,
/// dates, memos, reference numbers and lines populated. An empty ledger is
/// `Ok(vec![])`; a failed read must be an `Err` so callers never mistake
/// an outage for an empty ledger.
#[async_trait]
pub trait BillReader: Send + Sync {
    /// Fetch every bill currently stored in the ledger
    async fn fetch_all_bills(&self) -> LedgerResult<Vec<ServiceBill>>;
}

/// Full ledger adapter used when bills are created
///
/// Commands are issued inside a session opened with [`BillLedger::open_session`]
/// and released with [`BillLedger::close_session`].
#[async_trait]
pub trait BillLedger: BillReader {
    /// Open a session on behalf of the named application
    async fn open_session(&mut self, app_name: &str) -> LedgerResult<()>;

    /// Release the current session
    async fn close_session(&mut self) -> LedgerResult<()>;

    /// Names of every vendor known to the ledger
    async fn list_vendor_names(&self) -> LedgerResult<Vec<String>>;

    /// Submit a vendor creation command
    async fn create_vendor(&mut self, name: &str) -> LedgerResult<CommandStatus>;

    /// Submit a bill creation command with all of its lines attached
    async fn create_bill(&mut self, bill: &ServiceBill) -> LedgerResult<BillAddReply>;

    /// Whether a vendor with this name exists, ignoring case
    async fn vendor_exists(&self, name: &str) -> LedgerResult<bool> {
        let wanted = name.to_lowercase();
        Ok(self
            .list_vendor_names()
            .await?
            .iter()
            .any(|existing| existing.to_lowercase() == wanted))
    }
}

/// Trait for implementing custom bill validation rules
pub trait BillValidator: Send + Sync {
    /// Validate a bill before it is submitted to the ledger
    fn validate_bill(&self, bill: &ServiceBill) -> LedgerResult<()>;
}

/// Default bill validator with basic rules
pub struct DefaultBillValidator;

impl BillValidator for DefaultBillValidator {
    fn validate_bill(&self, bill: &ServiceBill) -> LedgerResult<()> {
        crate::utils::validate_vendor_name(&bill.vendor_name)?;
        crate::utils::validate_reference_number(&bill.reference_number)?;
        crate::utils::validate_bill_lines(&bill.lines)
    }
}
