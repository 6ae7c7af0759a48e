//! E2E tests for the offline listing commands and argument handling

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new("cargo")
        .arg("run")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Received installments render from a saved response
#[test]
fn installments_from_file() {
    let output = run(&[
        "installments",
        "received",
        "--from-file",
        "tests/data/received.json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("PED-1001"));
    assert!(stdout.contains("2003"));
    assert!(stdout.contains("Antecipado"));
    assert!(stdout.contains("10/02/2024"));
    assert!(stdout.contains("Parcelas recebidas (3) - Total: R$ 1.380,50"));
}

/// Amount and date filters narrow the list
#[test]
fn installments_filtered() {
    let output = run(&[
        "installments",
        "received",
        "--from-file",
        "tests/data/received.json",
        "--start",
        "2024-02-01",
        "--min",
        "50",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("2003"));
    assert!(!stdout.contains("PED-1001"));
    assert!(!stdout.contains("PED-1002"));
    assert!(stdout.contains("Parcelas recebidas (filtradas) (1) - Total: R$ 1.240,50"));
}

/// Totals-only output cannot be filtered
#[test]
fn transactions_summary_rejects_filters() {
    let output = run(&[
        "transactions",
        "--summary",
        "--method",
        "pix",
        "--from-file",
        "tests/data/transactions.json",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Command should fail: {:?}", output);
    assert!(stderr.contains("cannot be used with"));
}

/// Status filter on installments
#[test]
fn installments_filter_by_status() {
    let output = run(&[
        "installments",
        "received",
        "--from-file",
        "tests/data/received.json",
        "--status",
        "received_advance",
        "--csv",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "unexpected CSV: {}", stdout);
    assert!(lines[0].starts_with("external_reference,installment,amount"));
    assert!(lines[1].starts_with("PED-1002,2/2"));
}

/// Transactions are listed newest first with per-type totals
#[test]
fn transactions_from_file() {
    let output = run(&[
        "transactions",
        "--from-file",
        "tests/data/transactions.json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let t4 = stdout.find("T-4").expect("T-4 missing");
    let t2 = stdout.find("T-2").expect("T-2 missing");
    let t1 = stdout.find("T-1").expect("T-1 missing");
    let t3 = stdout.find("T-3").expect("T-3 missing");
    assert!(t4 < t2 && t2 < t1 && t1 < t3);
    assert!(stdout.contains("payment (3): R$ 385,00"));
    assert!(stdout.contains("refund (1): -R$ 30,00"));
}

/// A payment method nobody used yields an empty result, not an error
#[test]
fn transactions_unmatched_method() {
    let output = run(&[
        "transactions",
        "--from-file",
        "tests/data/transactions.json",
        "--method",
        "boleto",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("Nenhuma transação encontrada"));
}

/// Filtered groups are recomputed in JSON output
#[test]
fn transactions_filtered_json() {
    let output = run(&[
        "transactions",
        "--from-file",
        "tests/data/transactions.json",
        "--method",
        "pix",
        "--json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let groups: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON");
    assert_eq!(groups["payment"]["count"], 2);
    assert!(groups.get("refund").is_none());
}

/// Schema output for a payload
#[test]
fn schema_installments() {
    let output = run(&["schema", "installments"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("external_reference"));
    assert!(stdout.contains("installment_net_amount"));
}

/// Blank references are rejected before any request
#[test]
fn debug_rejects_blank_reference() {
    let output = run(&["debug", "   "]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("external reference must not be empty"));
}

/// Invalid backend URLs fail fast
#[test]
fn invalid_api_url() {
    let output = run(&["--api-url", "not a url", "status"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("invalid api url"));
}
