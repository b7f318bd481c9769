//! Reconcile and create service bills against an in-memory ledger

use service_bills_sync::utils::MemoryLedger;
use service_bills_sync::{BillSync, ReconciliationSummary, ServiceBill, SyncConfig};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🧾 Service Bills Sync - Demo\n");

    let ledger = MemoryLedger::new();
    ledger.insert_bill(
        ServiceBill::new(
            "Globex",
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            "Demo201",
            "SBILL_DEMO301",
        )
        .with_line("Utilities", BigDecimal::from(80)),
    )?;

    let config = SyncConfig::from_json(r#"{ "app_name": "Service Bills Demo" }"#)?;
    let mut sync = BillSync::with_config(ledger.clone(), config);

    println!("===== Current Service Bills in Ledger =====");
    display_service_bills(&ledger.bills());

    let today = chrono::Utc::now().date_naive();
    let local_bills = vec![
        ServiceBill::new("A", today, "Demo202", "SBILL_DEMO302")
            .with_line("Computer and Internet Expenses", BigDecimal::from(45))
            .with_line("Office Supplies", BigDecimal::from(10)),
        ServiceBill::new("B", today, "Demo203", "SBILL_DEMO303")
            .with_line("Telephone Expense", BigDecimal::from(30))
            .with_line("Automobile Expense", BigDecimal::from(20)),
    ];

    println!("\n===== Reconciliation =====");
    let reconciled = sync.reconcile(&local_bills).await?;
    for result in &reconciled {
        println!(
            "  {:<20}{:<20}{:<12}{}",
            result.bill.vendor_name, result.bill.reference_number, result.status, result.bill.id
        );
    }
    println!("  {:?}", ReconciliationSummary::from_results(&reconciled));

    println!("\n===== Creating Added Bills =====");
    for result in sync.create_added(&reconciled).await {
        println!(
            "  {:<20}{:<20}{:?}",
            result.bill.vendor_name, result.bill.reference_number, result.outcome
        );
    }

    println!("\n===== Updated Service Bills in Ledger =====");
    display_service_bills(&ledger.bills());

    let summary = ReconciliationSummary::from_results(&sync.reconcile(&local_bills).await?);
    println!("\n  {:?}", summary);

    Ok(())
}

fn display_service_bills(bills: &[ServiceBill]) {
    println!("{}", "-".repeat(80));
    println!("{:<20}{:<15}{:<35}{:>10}", "Vendor", "Date", "AccountName", "Amount");
    println!("{}", "-".repeat(80));

    for bill in bills {
        for line in &bill.lines {
            println!(
                "{:<20}{:<15}{:<35}{:>10}",
                bill.vendor_name,
                bill.bill_date.format("%Y-%m-%d").to_string(),
                line.account_name,
                format!("${:.2}", line.amount)
            );
        }
    }
}
