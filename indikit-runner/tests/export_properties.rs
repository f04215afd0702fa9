//! Property tests for batch reports and their CSV export.
//!
//! Uses proptest to verify:
//! 1. The CSV has a header plus one line per dataset row
//! 2. Padding outputs changes the report, never the exported cells
//! 3. Parallel and sequential runs produce the same report

use proptest::prelude::*;

use indikit_runner::{export_csv, export_json, run_batch, BatchConfig, Dataset, StudyConfig};

// ── Strategies (proptest) ────────────────────────────────────────────

/// A close series with an occasional missing (NaN) sample.
fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![9 => (1.0..500.0_f64), 1 => Just(f64::NAN)],
        12..60,
    )
}

fn arb_period() -> impl Strategy<Value = usize> {
    1usize..10
}

fn dataset(close: Vec<f64>) -> Dataset {
    let volume = vec![1000.0; close.len()];
    Dataset::new()
        .with_column("close", close)
        .and_then(|d| d.with_column("volume", volume))
        .unwrap()
}

fn config(p: usize, parallel: bool, pad_outputs: bool) -> BatchConfig {
    BatchConfig {
        parallel,
        pad_outputs,
        ..BatchConfig::default()
    }
    .with_study(StudyConfig::new("sma", &[p as f64], &["close"]))
    .with_study(StudyConfig::new("bbands", &[p as f64, 2.0], &["close"]).with_label("bands"))
    .with_study(StudyConfig::new("obv", &[], &["close", "volume"]))
}

// ── 1. Row Count ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn csv_has_one_line_per_row(close in arb_closes(), p in arb_period()) {
        let rows = close.len();
        let report = run_batch(&config(p, false, false), &dataset(close)).unwrap();
        let csv = export_csv(&report).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        prop_assert_eq!(lines.len(), rows + 1);
        // row, sma, three bands, obv
        prop_assert!(lines.iter().all(|l| l.split(',').count() == 6));
        for (row, line) in lines[1..].iter().enumerate() {
            let first_cell = line.split(',').next().unwrap_or_default();
            prop_assert_eq!(first_cell, row.to_string());
        }
    }
}

// ── 2. Padding Is Invisible In CSV ───────────────────────────────────

proptest! {
    #[test]
    fn padding_does_not_change_csv_cells(close in arb_closes(), p in arb_period()) {
        let ds = dataset(close);
        let plain = run_batch(&config(p, false, false), &ds).unwrap();
        let padded = run_batch(&config(p, false, true), &ds).unwrap();

        let sma = padded.study("sma").unwrap();
        prop_assert_eq!(sma.outputs[0].values.len(), ds.rows());
        prop_assert_eq!(plain.study("sma").unwrap().outputs[0].values.len(), ds.rows() + 1 - p);

        prop_assert_eq!(export_csv(&plain).unwrap(), export_csv(&padded).unwrap());
    }
}

// ── 3. Parallel Matches Sequential ───────────────────────────────────

proptest! {
    #[test]
    fn parallel_report_matches_sequential(close in arb_closes(), p in arb_period()) {
        let ds = dataset(close);
        let seq = run_batch(&config(p, false, false), &ds).unwrap();
        let par = run_batch(&config(p, true, false), &ds).unwrap();

        prop_assert_ne!(&seq.fingerprint, &par.fingerprint);
        prop_assert_eq!(export_csv(&seq).unwrap(), export_csv(&par).unwrap());

        let strip = |json: String| {
            let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
            value["fingerprint"] = serde_json::Value::Null;
            value
        };
        prop_assert_eq!(
            strip(export_json(&seq).unwrap()),
            strip(export_json(&par).unwrap())
        );
    }
}
