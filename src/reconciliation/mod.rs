//! Reconciliation of local service bills against the ledger

pub mod engine;
pub mod equivalence;
pub mod pending;

pub use engine::*;
pub use equivalence::*;
pub use pending::*;
