//! Ledger module containing bill creation and vendor management

pub mod creation;
pub mod sync;
pub mod vendor;

pub use creation::*;
pub use sync::*;
pub use vendor::*;
