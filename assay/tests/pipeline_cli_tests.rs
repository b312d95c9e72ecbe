use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A throwaway copy of the `demos/upay` project.
struct AssayTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl AssayTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .context("Workspace root not found")?
            .join("demos/upay");

        let dest = tmp.path().join("upay");
        copy_dir(&project_root, &dest)?;

        Ok(Self {
            _tmp: tmp,
            root: dest,
        })
    }

    fn assay(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("assay"));
        cmd.current_dir(&self.root);
        cmd.env_remove("ASSAY_TARGET_PATH")
            .env_remove("ASSAY_INPUT_PATH")
            .env_remove("ASSAY_STRICT");
        cmd
    }

    fn snapshot(&self, rel: &str) -> PathBuf {
        self.root.join("target/snapshot").join(rel)
    }

    fn read_rows(&self, rel: &str) -> Result<Vec<serde_json::Value>> {
        Ok(serde_json::from_str(&fs::read_to_string(self.snapshot(rel))?)?)
    }
}

fn copy_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            if entry.file_name() == "target" {
                continue;
            }
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

fn ids(rows: &[serde_json::Value], key: &str) -> Vec<String> {
    rows.iter()
        .map(|r| r[key].as_str().unwrap_or("null").to_string())
        .collect()
}

#[test]
fn test_run_publishes_clean_and_rejected_sets() -> Result<()> {
    let env = AssayTestEnv::new()?;

    env.assay()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));

    assert!(env.root.join("target/state.json").exists());
    assert!(env.root.join("target/run_results.json").exists());
    assert!(env.snapshot("metrics.json").exists());

    // Latest version of C002 wins, customers ordered by key.
    let customers = env.read_rows("clean/customers.json")?;
    assert_eq!(ids(&customers, "customer_id"), vec!["C001", "C002"]);
    assert_eq!(customers[1]["customer_age"], serde_json::json!(41.0));
    assert_eq!(customers[0]["customer_name"], "ANA SILVA");
    assert_eq!(customers[0]["preferred_payment_method"], "CARD");

    let merchants = env.read_rows("clean/merchants.json")?;
    assert_eq!(merchants.len(), 1);
    assert_eq!(merchants[0]["processing_tier"], "STANDARD");

    let transactions = env.read_rows("clean/transactions.json")?;
    assert_eq!(
        ids(&transactions, "transaction_id"),
        vec!["T001", "T002", "T005"]
    );
    assert_eq!(transactions[0]["currency"], "USD");
    assert_eq!(transactions[0]["amount_converted"], serde_json::json!(153.0));
    assert_eq!(transactions[1]["is_fraud"], true);
    assert_eq!(transactions[1]["failure_category"], "FRAUD");
    assert_eq!(transactions[2]["failure_category"], "TIMEOUT");

    // L003 belongs to a rejected transaction; L001 is superseded by L002.
    let events = env.read_rows("clean/transaction_events.json")?;
    assert_eq!(ids(&events, "log_id"), vec!["L002", "L004"]);

    Ok(())
}

#[test]
fn test_reject_audit_trail() -> Result<()> {
    let env = AssayTestEnv::new()?;
    env.assay().arg("run").assert().success();

    let mut lines = Vec::new();
    for (table, key) in [
        ("customers", "customer_id"),
        ("merchants", "merchant_id"),
        ("transactions", "transaction_id"),
        ("transaction_events", "log_id"),
    ] {
        let rows = env.read_rows(&format!("rejected/{}.json", table))?;
        for row in rows {
            lines.push(format!(
                "{} {} {}",
                table,
                row[key].as_str().unwrap_or("null"),
                row["reject_reason"].as_str().unwrap_or("?")
            ));
        }
    }

    insta::assert_snapshot!(lines.join("\n"), @r"
    customers null MISSING_CUSTOMER_ID
    customers C003 AGE_OUT_OF_RANGE
    customers C004 MISSING_COUNTRY
    customers C005 RISK_SCORE_NOT_NUMERIC
    merchants M002 INVALID_CATEGORY_CODE
    merchants M003 INVALID_ACCOUNT_STATUS
    merchants M004 INVALID_RISK_LEVEL
    transactions T003 NON_POSITIVE_AMOUNT
    transactions T004 INVALID_CURRENCY
    transaction_events L005 MISSING_TRANSACTION_ID
    ");

    // Raw values are kept as delivered.
    let rejected = env.read_rows("rejected/customers.json")?;
    assert_eq!(rejected[3]["risk_score"], "high");
    assert_eq!(rejected[3]["violation_kind"], "not_numeric");
    Ok(())
}

#[test]
fn test_rerun_is_byte_identical() -> Result<()> {
    let env = AssayTestEnv::new()?;
    let tables = [
        "clean/customers.json",
        "clean/transactions.json",
        "clean/transaction_events.json",
        "rejected/customers.json",
        "metrics.json",
    ];

    env.assay().arg("run").assert().success();
    let first: Vec<String> = tables
        .iter()
        .map(|t| fs::read_to_string(env.snapshot(t)))
        .collect::<std::io::Result<_>>()?;

    env.assay().arg("run").assert().success();
    let second: Vec<String> = tables
        .iter()
        .map(|t| fs::read_to_string(env.snapshot(t)))
        .collect::<std::io::Result<_>>()?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_malformed_input_keeps_previous_snapshot() -> Result<()> {
    let env = AssayTestEnv::new()?;
    env.assay().arg("run").assert().success();
    let before = fs::read_to_string(env.snapshot("clean/merchants.json"))?;

    fs::write(
        env.root.join("data/raw/merchants.json"),
        r#"{"merchant_id": "M001"}"#,
    )?;
    env.assay()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed collection"));

    assert_eq!(
        fs::read_to_string(env.snapshot("clean/merchants.json"))?,
        before
    );
    Ok(())
}

#[test]
fn test_missing_input_fails() -> Result<()> {
    let env = AssayTestEnv::new()?;
    fs::remove_file(env.root.join("data/raw/transaction_events.jsonl"))?;

    env.assay()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("transaction_events"));
    assert!(!env.snapshot("metrics.json").exists());
    Ok(())
}

#[test]
fn test_row_count_drop_warns_unless_strict_mode_is_opted_in() -> Result<()> {
    let env = AssayTestEnv::new()?;
    env.assay().arg("run").assert().success();

    // Two of three clean transactions disappear: a 66% drop.
    let all: Vec<serde_json::Value> = serde_json::from_str(&fs::read_to_string(
        env.root.join("data/raw/transactions.json"),
    )?)?;
    fs::write(
        env.root.join("data/raw/transactions.json"),
        serde_json::to_string(&all[..1])?,
    )?;

    env.assay()
        .arg("run")
        .env("ASSAY_STRICT", "true")
        .assert()
        .failure()
        .stderr(predicate::str::contains("deviation"));
    assert_eq!(env.read_rows("clean/transactions.json")?.len(), 3);

    env.assay()
        .arg("run")
        .assert()
        .success()
        .stderr(predicate::str::contains("Bypass"));
    assert_eq!(env.read_rows("clean/transactions.json")?.len(), 1);
    Ok(())
}

#[test]
fn test_report_and_inspect() -> Result<()> {
    let env = AssayTestEnv::new()?;

    env.assay()
        .arg("report")
        .assert()
        .failure();

    env.assay().arg("run").assert().success();

    env.assay()
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("transaction_events"))
        .stdout(predicate::str::contains("violations.customer_age_in_range"))
        .stdout(predicate::str::contains("superseded_events"));

    env.assay()
        .args(["inspect", "--entity", "transactions", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T001"))
        .stdout(predicate::str::contains("T002").not());

    env.assay()
        .args(["inspect", "--entity", "merchant", "--rejected"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INVALID_CATEGORY_CODE"));
    Ok(())
}

#[test]
fn test_clean_removes_target() -> Result<()> {
    let env = AssayTestEnv::new()?;
    env.assay().arg("run").assert().success();
    assert!(env.root.join("target").exists());

    env.assay()
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Artifact removed"));
    assert!(!env.root.join("target").exists());
    assert!(env.root.join("data/raw/customers.json").exists());
    Ok(())
}
