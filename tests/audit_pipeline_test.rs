use multisend_auditor::datasource::{read_address_book, read_payouts};
use multisend_auditor::orchestration::{render_report, Auditor};
use multisend_auditor::{
    Address, Amount, AppError, MockTransactionSource, ReconciliationPolicy, ValidationError,
    Verdict,
};
use serde_json::json;
use std::sync::Arc;

const MULTISEND: &str = "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D";
const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
const TOKEN: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const SOLVER: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
const TARGET: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";
const STRANGER: &str = "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb";

const ADDRESS_BOOK: &str = "\
address,name,chainId
0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359,prod-solver1,1
0xdbf03b407c01e7cd3cbea99509d93f8dddc8c6fb,RewardTarget(solver1),1
0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb,barn-solver2,5
";

fn addr(s: &str) -> Address {
    Address::parse(s).unwrap()
}

fn policy() -> ReconciliationPolicy {
    ReconciliationPolicy {
        multisend: addr(MULTISEND),
        wrapped_native: addr(WETH),
        primary_token: addr(TOKEN),
        token_decimals: 18,
        payout_tolerance: Amount::from(5_000u64),
    }
}

fn native_json(to: &str, value: &str) -> serde_json::Value {
    json!({ "operation": 0, "to": to, "value": value, "data": null, "dataDecoded": null })
}

fn call_json(to: &str, method: &str, params: serde_json::Value) -> serde_json::Value {
    json!({
        "operation": 0,
        "to": to,
        "value": "0",
        "data": "0xa9059cbb",
        "dataDecoded": { "method": method, "parameters": params }
    })
}

fn transfer_json(receiver: &str, amount: &str) -> serde_json::Value {
    call_json(
        TOKEN,
        "transfer",
        json!([
            { "name": "to", "type": "address", "value": receiver },
            { "name": "value", "type": "uint256", "value": amount }
        ]),
    )
}

fn envelope_json(subs: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "txInfo": { "to": { "value": MULTISEND } },
        "txData": {
            "value": "0",
            "dataDecoded": {
                "method": "multiSend",
                "parameters": [{ "name": "transactions", "valueDecoded": subs }]
            }
        }
    })
}

fn make_auditor(source: MockTransactionSource) -> Auditor {
    let registry = read_address_book(ADDRESS_BOOK.as_bytes()).unwrap();
    Auditor::new(Arc::new(source), Arc::new(registry), policy())
}

#[tokio::test]
async fn test_run_writes_sorted_ledger() {
    let body = envelope_json(vec![
        call_json(WETH, "withdraw", json!([{ "name": "wad", "value": "2000000000000000000" }])),
        native_json(SOLVER, "2000000000000000000"),
        transfer_json(TARGET, "1500000000000000000"),
    ]);
    let source = MockTransactionSource::new().with_json("tx1", body).unwrap();
    let auditor = make_auditor(source);

    let dir = tempfile::tempdir().unwrap();
    let ledger_path = dir.path().join("ledger.csv");
    let outcome = auditor.run("tx1", None, &ledger_path).await.unwrap();

    assert_eq!(outcome.ledger_rows, 2);
    assert_eq!(outcome.result.verdict(), Verdict::Valid);
    assert_eq!(
        outcome.result.totals.native.to_human_units(18),
        "2.000000000000000000"
    );

    let text = std::fs::read_to_string(&ledger_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "receiver,amount,token,name");
    // 0xfb69... sorts above 0xdbf0... in descending lowercase order.
    assert!(lines[1].starts_with("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359,2000000000000000000,NATIVE,"));
    assert!(lines[1].contains("prod-solver1 @ chainId 1"));
    assert!(lines[2].starts_with(
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB,1500000000000000000,0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed,"
    ));
}

#[tokio::test]
async fn test_wrong_chain_solver_is_not_authorized() {
    let body = envelope_json(vec![native_json(STRANGER, "1")]);
    let source = MockTransactionSource::new().with_json("tx", body).unwrap();
    let auditor = make_auditor(source);

    let result = auditor.reconcile("tx", None).await.unwrap();

    assert_eq!(result.verdict(), Verdict::RequiresInvestigation);
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].message.contains("barn-solver2 @ chainId 5"));
}

#[tokio::test]
async fn test_payout_plan_mismatch_is_reported() {
    let body = envelope_json(vec![
        native_json(SOLVER, "1000000000000000000"),
        transfer_json(TARGET, "999999999999990000"),
    ]);
    let source = MockTransactionSource::new().with_json("tx", body).unwrap();
    let auditor = make_auditor(source);

    let plan = format!(
        "token_type,token_address,receiver,amount\nnative,,{},1.0\nerc20,{},{},1.0\n",
        SOLVER, TOKEN, TARGET
    );
    let payouts = read_payouts(plan.as_bytes()).unwrap();

    let result = auditor.reconcile("tx", Some(payouts.as_slice())).await.unwrap();

    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].message.contains("off by 10000 base units"));

    let report = render_report(&result.diagnostics, result.verdict());
    assert!(report.starts_with("1 issue(s) found:"));
    assert!(report.ends_with("Transaction is invalid and requires investigation\n"));
}

#[tokio::test]
async fn test_structural_failure_writes_no_ledger() {
    let body = envelope_json(vec![
        native_json(SOLVER, "1"),
        call_json(WETH, "transfer", json!([])),
    ]);
    let source = MockTransactionSource::new().with_json("tx", body).unwrap();
    let auditor = make_auditor(source);

    let dir = tempfile::tempdir().unwrap();
    let ledger_path = dir.path().join("ledger.csv");
    let err = auditor.run("tx", None, &ledger_path).await.unwrap_err();

    assert_eq!(err.exit_code(), 2);
    match err {
        AppError::Validation(aborted) => {
            assert_eq!(aborted.error, ValidationError::WethUnwrap { position: 2 });
            assert_eq!(aborted.diagnostics.len(), 1);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!ledger_path.exists());
}

#[tokio::test]
async fn test_unknown_transaction_is_source_error() {
    let auditor = make_auditor(MockTransactionSource::new());
    let err = auditor.reconcile("missing", None).await.unwrap_err();

    assert_eq!(err.exit_code(), 1);
    assert!(matches!(err, AppError::Source(_)));
}
