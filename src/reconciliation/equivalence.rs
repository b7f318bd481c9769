//! Field-level comparison of two bills sharing a composite key

use bigdecimal::BigDecimal;

use crate::types::*;

/// Whether two line amounts differ by strictly less than `tolerance`
pub fn amounts_match(a: &BigDecimal, b: &BigDecimal, tolerance: &BigDecimal) -> bool {
    (a - b).abs() < *tolerance
}

/// Compare a ledger bill with a local bill
///
/// Memos must match ignoring case, both bills must carry the same number
/// of lines, and every ledger line must have a local line with the same
/// account name (ignoring case) and an amount within `tolerance`. Line
/// order is not significant.
pub fn bills_equivalent(
    reference: &ServiceBill,
    candidate: &ServiceBill,
    tolerance: &BigDecimal,
) -> bool {
    if reference.memo.to_lowercase() != candidate.memo.to_lowercase() {
        return false;
    }

    if reference.lines.len() != candidate.lines.len() {
        return false;
    }

    reference.lines.iter().all(|expected| {
        let account = expected.account_name.to_lowercase();
        candidate.lines.iter().any(|line| {
            line.account_name.to_lowercase() == account
                && amounts_match(&line.amount, &expected.amount, tolerance)
        })
    })
}
