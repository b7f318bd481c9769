//! Vendor existence guard

use tracing::info;

use crate::traits::*;
use crate::types::*;

/// Make sure the ledger knows the vendor before a bill references it
///
/// Creates the vendor when no vendor with that name exists (ignoring case).
/// A refused creation command is returned as [`LedgerError::VendorCreation`].
pub async fn ensure_vendor<L: BillLedger + ?Sized>(
    ledger: &mut L,
    vendor_name: &str,
) -> LedgerResult<()> {
    if ledger.vendor_exists(vendor_name).await? {
        return Ok(());
    }

    info!("Vendor '{}' not found. Adding now...", vendor_name);

    let status = ledger.create_vendor(vendor_name).await?;
    if !status.is_ok() {
        return Err(LedgerError::VendorCreation {
            vendor: vendor_name.to_string(),
            message: status.message,
        });
    }

    info!("Vendor '{}' successfully added.", vendor_name);
    Ok(())
}
