//! Integration tests for service-bills-sync

use service_bills_sync::{
    utils::MemoryLedger, BillCreationService, BillStatus, BillSync, CreationOutcome,
    LedgerError, ReconciliationEngine, ReconciliationSummary, ServiceBill, SyncConfig,
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::str::FromStr;
use tracing_test::traced_test;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn service_bill(vendor: &str, reference: &str, memo: &str, lines: &[(&str, &str)]) -> ServiceBill {
    lines.iter().fold(
        ServiceBill::new(
            vendor,
            NaiveDate::from_ymd_opt(2024, 9, 30).unwrap(),
            memo,
            reference,
        ),
        |bill, (account, amount)| bill.with_line(*account, dec(amount)),
    )
}

#[tokio::test]
#[traced_test]
async fn test_repeated_comparison_statuses_and_logs() {
    let engine = ReconciliationEngine::new(MemoryLedger::new());

    let initial: Vec<ServiceBill> = (0..5)
        .map(|i| {
            service_bill(
                "TestVendor",
                &format!("SB-{i:03}"),
                &format!("AutoTest Memo #{i}"),
                &[("TestExpense", format!("{}.25", 50 + i * 10).as_str())],
            )
        })
        .collect();

    // First pass: nothing is in the ledger yet
    let first = engine.reconcile(&initial).await.unwrap();
    assert_eq!(first.len(), 5);
    for result in &first {
        assert_eq!(result.status, BillStatus::Added);
        assert!(result.bill.has_id());
    }

    // Drop one bill and edit another
    let mut updated = initial.clone();
    let removed = updated.remove(0);
    updated[0].memo.push_str("_MOD");
    let modified = updated[0].clone();

    let second = engine.reconcile(&updated).await.unwrap();
    let by_reference: HashMap<&str, _> = second
        .iter()
        .map(|r| (r.bill.reference_number.as_str(), r))
        .collect();

    assert_eq!(by_reference[removed.reference_number.as_str()].status, BillStatus::Missing);
    assert_eq!(by_reference[modified.reference_number.as_str()].status, BillStatus::Different);
    for bill in updated.iter().skip(1) {
        let result = by_reference[bill.reference_number.as_str()];
        assert_eq!(result.status, BillStatus::Added);
    }

    let first_ids: HashMap<&str, &str> = first
        .iter()
        .map(|r| (r.bill.reference_number.as_str(), r.bill.id.as_str()))
        .collect();
    for result in &second {
        assert_eq!(first_ids[result.bill.reference_number.as_str()], result.bill.id);
    }

    assert!(logs_contain("ServiceBillComparator Initialized"));
    assert!(logs_contain("ServiceBillComparator Completed"));
    for result in first.iter().chain(second.iter()) {
        assert!(logs_contain(&format!(
            "ServiceBill {} is {}.",
            result.bill.reference_number, result.status
        )));
    }
}

#[tokio::test]
async fn test_tolerance_scenarios() {
    let ledger = MemoryLedger::new();
    ledger
        .insert_bill(service_bill("V1", "INV1", "m", &[("Acct", "10.00")]).with_id("TXN-100"))
        .unwrap();
    let engine = ReconciliationEngine::new(ledger);

    let within = engine
        .reconcile(&[service_bill("V1", "INV1", "m", &[("Acct", "10.001")])])
        .await
        .unwrap();
    assert_eq!(within[0].status, BillStatus::Unchanged);

    let outside = engine
        .reconcile(&[service_bill("V1", "INV1", "m", &[("Acct", "10.02")])])
        .await
        .unwrap();
    assert_eq!(outside[0].status, BillStatus::Different);
    assert_eq!(outside[0].bill.id, "TXN-100");
}

#[tokio::test]
async fn test_custom_tolerance() {
    let ledger = MemoryLedger::new();
    ledger
        .insert_bill(service_bill("V1", "INV1", "m", &[("Acct", "10.00")]))
        .unwrap();
    let config = SyncConfig::from_json(r#"{ "amount_tolerance": "0.5" }"#).unwrap();
    let engine = ReconciliationEngine::with_config(ledger, config);

    let results = engine
        .reconcile(&[service_bill("V1", "INV1", "m", &[("Acct", "10.40")])])
        .await
        .unwrap();
    assert_eq!(results[0].status, BillStatus::Unchanged);
}

#[tokio::test]
async fn test_missing_bills_keep_ledger_order_after_candidates() {
    let ledger = MemoryLedger::new();
    for reference in ["L-1", "L-2", "L-3"] {
        ledger
            .insert_bill(service_bill("Acme", reference, "", &[("Rent", "1")]))
            .unwrap();
    }
    let engine = ReconciliationEngine::new(ledger.clone());

    let results = engine
        .reconcile(&[
            service_bill("Acme", "NEW-1", "", &[("Rent", "1")]),
            service_bill("Acme", "L-2", "", &[("Rent", "1")]),
        ])
        .await
        .unwrap();

    let order: Vec<(&str, BillStatus)> = results
        .iter()
        .map(|r| (r.bill.reference_number.as_str(), r.status))
        .collect();
    assert_eq!(
        order,
        vec![
            ("NEW-1", BillStatus::Added),
            ("L-2", BillStatus::Unchanged),
            ("L-1", BillStatus::Missing),
            ("L-3", BillStatus::Missing),
        ]
    );

    let stored = ledger.bills();
    assert_eq!(results[2].bill, stored[0]);
    assert_eq!(results[3].bill, stored[2]);
}

#[tokio::test]
async fn test_separate_engines_do_not_share_pending_bills() {
    let ledger = MemoryLedger::new();
    let candidates = vec![service_bill("Acme", "SB-1", "", &[("Rent", "1")])];

    let first_engine = ReconciliationEngine::new(ledger.clone());
    let second_engine = ReconciliationEngine::new(ledger.clone());

    let first = first_engine.reconcile(&candidates).await.unwrap();
    let second = second_engine.reconcile(&candidates).await.unwrap();

    assert_eq!(first[0].status, BillStatus::Added);
    assert_eq!(second[0].status, BillStatus::Added);
    assert_ne!(first[0].bill.id, second[0].bill.id);

    let shared = ReconciliationEngine::new(ledger).with_pending(first_engine.pending().clone());
    let third = shared.reconcile(&candidates).await.unwrap();
    assert_eq!(third[0].bill.id, first[0].bill.id);
}

#[tokio::test]
async fn test_read_failure_is_not_treated_as_empty_ledger() {
    let ledger = MemoryLedger::new();
    ledger.fail_reads(true);
    let engine = ReconciliationEngine::new(ledger);

    let err = engine
        .reconcile(&[service_bill("Acme", "SB-1", "", &[("Rent", "1")])])
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Read(_)));
}

#[tokio::test]
#[traced_test]
async fn test_create_service_bills() {
    let ledger = MemoryLedger::new();
    ledger.add_vendor("TestVend_1");
    let mut service = BillCreationService::new(ledger.clone());

    let bills: Vec<ServiceBill> = (0..2)
        .map(|i| {
            service_bill(
                &format!("TestVend_{}", i + 1),
                &format!("ServiceBill_{}", 200 + i),
                &(100 + i).to_string(),
                &[
                    ("Utilities", (25 + i).to_string().as_str()),
                    ("Computer and Internet Expenses", (10 + i).to_string().as_str()),
                ],
            )
        })
        .collect();

    let results = service.create_bills(&bills).await;

    let stored = ledger.bills();
    for result in &results {
        let CreationOutcome::Created { id } = &result.outcome else {
            panic!("bill {} was not created", result.bill.reference_number);
        };
        assert_eq!(&result.bill.id, id);
        assert!(stored.iter().any(|b| &b.id == id));
    }

    // Second vendor did not exist before the batch
    assert_eq!(ledger.vendors().len(), 2);
    assert!(logs_contain("Vendor 'TestVend_2' not found. Adding now..."));
    assert_eq!(ledger.session_app_name(), None);
}

#[tokio::test]
#[traced_test]
async fn test_duplicate_create_guard() {
    let ledger = MemoryLedger::new();
    let mut service = BillCreationService::new(ledger.clone());
    let bill = service_bill("Acme", "SB-DUP", "m", &[("Rent", "100")]);

    let first = service.create_bills(&[bill.clone(), bill.clone()]).await;
    assert!(first[0].outcome.is_created());
    assert_eq!(first[1].outcome, CreationOutcome::SkippedDuplicate);

    let again = service.create_bills(&[bill]).await;
    assert_eq!(again[0].outcome, CreationOutcome::SkippedDuplicate);

    assert_eq!(ledger.bill_submissions(), 1);
    assert_eq!(ledger.bills().len(), 1);
    assert!(logs_contain("Skipped: Bill already exists for 'Acme'"));
}

#[tokio::test]
async fn test_no_bill_submitted_for_vendor_that_cannot_be_created() {
    let ledger = MemoryLedger::new();
    ledger.reject_vendor("Ghost Vendor");
    let mut service = BillCreationService::new(ledger.clone());

    let results = service
        .create_bills(&[service_bill("Ghost Vendor", "SB-1", "", &[("Rent", "1")])])
        .await;

    assert_eq!(results[0].outcome, CreationOutcome::NotProcessed);
    assert_eq!(ledger.bill_submissions(), 0);
    assert_eq!(ledger.sessions_opened(), 1);
    assert_eq!(ledger.sessions_closed(), 1);
}

#[tokio::test]
async fn test_full_sync_workflow() {
    let ledger = MemoryLedger::new();
    ledger
        .insert_bill(service_bill("Globex", "OLD-1", "legacy", &[("Rent", "900")]))
        .unwrap();
    let mut sync = BillSync::new(ledger.clone());

    let local = vec![
        service_bill(
            "Acme",
            "SBILL_DEMO302",
            "Demo202",
            &[
                ("Computer and Internet Expenses", "45.00"),
                ("Office Supplies", "10.00"),
            ],
        ),
        service_bill(
            "Initech",
            "SBILL_DEMO303",
            "Demo203",
            &[
                ("Telephone Expense", "30.00"),
                ("Automobile Expense", "20.00"),
            ],
        ),
    ];

    let before = sync.reconcile(&local).await.unwrap();
    assert_eq!(
        ReconciliationSummary::from_results(&before),
        ReconciliationSummary {
            unchanged: 0,
            different: 0,
            added: 2,
            missing: 1,
        }
    );

    let created = sync.create_added(&before).await;
    assert!(created.iter().all(|r| r.outcome.is_created()));

    let after = sync.reconcile(&local).await.unwrap();
    let summary = ReconciliationSummary::from_results(&after);
    assert_eq!(summary.unchanged, 2);
    assert_eq!(summary.missing, 1);
    assert_eq!(ledger.bills().len(), 3);
}
