//! Validation utilities

use std::collections::HashSet;

use crate::types::*;

/// Validate that a vendor name is usable
pub fn validate_vendor_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Vendor name cannot be empty".to_string(),
        ));
    }

    if name.len() > 41 {
        return Err(LedgerError::Validation(format!(
            "Vendor name '{}' cannot exceed 41 characters",
            name
        )));
    }

    Ok(())
}

/// Validate that a reference number is usable
pub fn validate_reference_number(reference: &str) -> LedgerResult<()> {
    if reference.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Reference number cannot be empty".to_string(),
        ));
    }

    if reference.len() > 20 {
        return Err(LedgerError::Validation(format!(
            "Reference number '{}' cannot exceed 20 characters",
            reference
        )));
    }

    Ok(())
}

/// Validate the expense lines of a bill
pub fn validate_bill_lines(lines: &[BillLine]) -> LedgerResult<()> {
    if lines.is_empty() {
        return Err(LedgerError::Validation(
            "Bill must have at least one expense line".to_string(),
        ));
    }

    if lines.iter().any(|line| line.account_name.trim().is_empty()) {
        return Err(LedgerError::Validation(
            "Expense line account name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Ensure no two bills in one snapshot share a composite key
pub fn ensure_unique_keys(bills: &[ServiceBill]) -> LedgerResult<()> {
    let mut seen = HashSet::new();
    for bill in bills {
        let key = bill.key();
        if !seen.insert(key.clone()) {
            return Err(LedgerError::DuplicateKey(key.to_string()));
        }
    }
    Ok(())
}
