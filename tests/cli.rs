//! Process-level behaviour of the `sales-forecast` binary.
//!
//! Only the JSON array may appear on stdout; diagnostics go to stderr and a
//! failed run exits non-zero without writing any rows.

use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use std::io::Write;
use std::process::{Command, Output, Stdio};

const TODAY: &str = "2024-06-15";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn records(start: NaiveDate, values: &[f64]) -> String {
    let rows: Vec<Value> = start
        .iter_days()
        .zip(values.iter())
        .map(|(d, y)| json!({"ds": d.format("%Y-%m-%d").to_string(), "y": y}))
        .collect();
    Value::Array(rows).to_string()
}

fn run_cli(input: &str, extra: &[&str]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sales-forecast"))
        .args(["--today", TODAY])
        .args(extra)
        .env_remove("RUST_LOG")
        .env_remove("SALES_FORECAST_INPUT")
        .env_remove("SALES_FORECAST_OUTPUT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_rows(output: &Output) -> Vec<Value> {
    let text = String::from_utf8(output.stdout.clone()).unwrap();
    assert!(text.ends_with('\n'));
    serde_json::from_str(text.trim_end()).unwrap()
}

fn assert_next_seven_days(rows: &[Value]) {
    assert_eq!(rows.len(), 7);
    for (i, row) in rows.iter().enumerate() {
        let expected = (today() + Duration::days(i as i64 + 1))
            .format("%Y-%m-%d")
            .to_string();
        assert_eq!(row["date"], json!(expected));
        assert!(row["forecast"].as_f64().unwrap().is_finite());
    }
}

#[test]
fn empty_input_prints_empty_array() {
    let output = run_cli("[]", &[]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "[]\n");
}

#[test]
fn short_history_prints_recent_average() {
    let output = run_cli(&records(today() - Duration::days(9), &[10.0; 10]), &[]);

    assert!(output.status.success());
    let rows = stdout_rows(&output);
    assert_next_seven_days(&rows);
    assert!(rows.iter().all(|row| row["forecast"] == json!(10.0)));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("falling back to recent average"));
    assert!(!stderr.contains('\u{1b}'), "stderr is not a terminal");
}

#[test]
fn long_history_prints_seasonal_forecast() {
    let start = today() - Duration::days(59);
    let values: Vec<f64> = (0..60)
        .map(|i| 20.0 + 6.0 * (2.0 * std::f64::consts::PI * i as f64 / 7.0).sin())
        .collect();

    let output = run_cli(&records(start, &values), &["--quiet-model"]);

    assert!(output.status.success());
    assert_next_seven_days(&stdout_rows(&output));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("backtest MAE over last 7 days"));
}

#[test]
fn json_log_format_keeps_stdout_clean() {
    let output = run_cli(
        &records(today() - Duration::days(4), &[3.0; 5]),
        &["--log-format", "json"],
    );

    assert!(output.status.success());
    assert_next_seven_days(&stdout_rows(&output));

    let stderr = String::from_utf8(output.stderr).unwrap();
    let first = stderr.lines().next().unwrap();
    assert!(serde_json::from_str::<Value>(first).is_ok());
}

#[test]
fn malformed_date_fails_without_output() {
    let output = run_cli(r#"[{"ds": "bad", "y": 1}]"#, &[]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("data format error"));
    assert_eq!(stderr.matches("data format error").count(), 1);
}

#[test]
fn model_failure_fails_without_output() {
    let start = NaiveDate::MAX - Duration::days(39);
    let output = run_cli(&records(start, &[5.0; 40]), &[]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("model fit error"));
}
