//! # Service Bills Sync
//!
//! Keeps a locally authored list of vendor service bills in step with the
//! bills held by an accounting ledger.
//!
//! ## Features
//!
//! - **Reconciliation**: classifies every bill as unchanged, different, added or missing
//!   using the case-insensitive `(vendor, reference number)` key
//! - **Tolerant comparison**: memos ignore case, lines ignore order, amounts match within a tolerance
//! - **Idempotent passes**: bills not yet in the ledger keep the same placeholder id across passes
//! - **Duplicate-safe creation**: bills already in the ledger, or repeated within a batch, are never resubmitted
//! - **Vendor guard**: missing vendors are created before a bill references them
//! - **Ledger abstraction**: any accounting backend can be plugged in through the `BillLedger` trait
//!
//! ## Quick Start
//!
//! ```rust
//! use service_bills_sync::{utils::MemoryLedger, BillStatus, BillSync, ServiceBill};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut sync = BillSync::new(MemoryLedger::new());
//! let bills = vec![ServiceBill::new(
//!     "Acme Plumbing",
//!     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//!     "January service",
//!     "INV-1001",
//! )
//! .with_line("Repairs and Maintenance", BigDecimal::from(120))];
//!
//! let reconciled = sync.reconcile(&bills).await.unwrap();
//! assert_eq!(reconciled[0].status, BillStatus::Added);
//!
//! sync.create_added(&reconciled).await;
//! let reconciled = sync.reconcile(&bills).await.unwrap();
//! assert_eq!(reconciled[0].status, BillStatus::Unchanged);
//! # }
//! ```

pub mod config;
pub mod ledger;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
