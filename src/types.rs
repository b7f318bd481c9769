//! Core types and data structures for bill synchronization

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reconciliation outcome of a single bill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillStatus {
    /// Not yet classified
    #[default]
    Unknown,
    /// Present on both sides with equivalent contents
    Unchanged,
    /// Present on both sides but memo or lines differ
    Different,
    /// Present locally but not in the ledger
    Added,
    /// The ledger rejected the bill when it was submitted
    FailedToAdd,
    /// Present in the ledger but not locally
    Missing,
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BillStatus::Unknown => "Unknown",
            BillStatus::Unchanged => "Unchanged",
            BillStatus::Different => "Different",
            BillStatus::Added => "Added",
            BillStatus::FailedToAdd => "FailedToAdd",
            BillStatus::Missing => "Missing",
        };
        f.pad(name)
    }
}

/// Expense line attached to a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLine {
    /// Expense account the amount is booked against (case-insensitive)
    pub account_name: String,
    /// Line amount
    pub amount: BigDecimal,
}

impl BillLine {
    /// Create a new bill line
    pub fn new(account_name: impl Into<String>, amount: BigDecimal) -> Self {
        Self {
            account_name: account_name.into(),
            amount,
        }
    }
}

/// Vendor service bill, either authored locally or read back from the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBill {
    /// Ledger-issued identifier; empty until the bill is persisted
    pub id: String,
    /// Vendor the bill is owed to
    pub vendor_name: String,
    /// Date the bill was issued
    pub bill_date: NaiveDate,
    /// Free-text memo
    pub memo: String,
    /// Vendor invoice number
    pub reference_number: String,
    /// Expense lines, order is not significant for comparison
    pub lines: Vec<BillLine>,
}

impl ServiceBill {
    /// Create a new bill that has not been persisted yet
    pub fn new(
        vendor_name: impl Into<String>,
        bill_date: NaiveDate,
        memo: impl Into<String>,
        reference_number: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            vendor_name: vendor_name.into(),
            bill_date,
            memo: memo.into(),
            reference_number: reference_number.into(),
            lines: Vec::new(),
        }
    }

    /// Set the ledger identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Append an expense line
    pub fn with_line(mut self, account_name: impl Into<String>, amount: BigDecimal) -> Self {
        self.lines.push(BillLine::new(account_name, amount));
        self
    }

    /// Composite identity of the bill
    pub fn key(&self) -> BillKey {
        BillKey::new(&self.vendor_name, &self.reference_number)
    }

    /// Whether the ledger has issued an id for this bill
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Sum of all line amounts
    pub fn total_amount(&self) -> BigDecimal {
        self.lines.iter().map(|l| &l.amount).sum()
    }
}

/// Case-insensitive `(vendor name, reference number)` pair identifying a bill
/// within one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BillKey {
    vendor: String,
    reference: String,
}

impl BillKey {
    pub fn new(vendor_name: &str, reference_number: &str) -> Self {
        Self {
            vendor: vendor_name.to_lowercase(),
            reference: reference_number.to_lowercase(),
        }
    }
}

impl fmt::Display for BillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vendor, self.reference)
    }
}

/// A bill together with the status assigned by one reconciliation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledBill {
    pub bill: ServiceBill,
    pub status: BillStatus,
}

impl ReconciledBill {
    pub fn new(bill: ServiceBill, status: BillStatus) -> Self {
        Self { bill, status }
    }
}

/// Status returned by the ledger for a single command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStatus {
    /// Zero on success, anything else is a rejection
    pub code: i32,
    pub message: String,
}

impl CommandStatus {
    /// Successful reply
    pub fn ok() -> Self {
        Self {
            code: 0,
            message: "Status OK".to_string(),
        }
    }

    /// Rejected reply
    pub fn rejected(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// Reply to a bill creation command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillAddReply {
    /// Transaction id issued by the ledger, when the bill was stored
    pub txn_id: Option<String>,
    pub status: CommandStatus,
}

/// Per-record result of a creation batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreationOutcome {
    /// The ledger stored the bill under this id
    Created { id: String },
    /// A bill with the same key already exists, nothing was submitted
    SkippedDuplicate,
    /// The ledger refused the bill
    Rejected { message: String },
    /// The bill failed local validation and was never submitted
    Invalid { message: String },
    /// The batch stopped before reaching this bill
    NotProcessed,
}

impl CreationOutcome {
    /// Map the outcome onto the reconciliation status vocabulary
    pub fn status(&self) -> BillStatus {
        match self {
            CreationOutcome::Created { .. } => BillStatus::Added,
            CreationOutcome::Rejected { .. } | CreationOutcome::Invalid { .. } => {
                BillStatus::FailedToAdd
            }
            CreationOutcome::SkippedDuplicate | CreationOutcome::NotProcessed => {
                BillStatus::Unknown
            }
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, CreationOutcome::Created { .. })
    }
}

/// A submitted bill paired with what happened to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationResult {
    /// The bill, carrying the ledger id when it was created
    pub bill: ServiceBill,
    pub outcome: CreationOutcome,
}

/// Errors that can occur while reading from or writing to the ledger
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Session error: {0}")]
    Session(String),
    #[error("Failed to read bills from ledger: {0}")]
    Read(String),
    #[error("Failed to add vendor '{vendor}': {message}")]
    VendorCreation { vendor: String, message: String },
    #[error("Duplicate bill key: {0}")]
    DuplicateKey(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
