//! Report export: JSON and aligned CSV.
//!
//! The CSV has one `row` column plus one column per study output, named
//! `{label}.{output}`. Each value sits on the dataset row it belongs to;
//! rows before an indicator's first value and NaN samples are empty cells.
//! In JSON, NaN samples serialize as `null`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::batch::BatchReport;

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(report: &BatchReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize BatchReport to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

pub fn export_csv(report: &BatchReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["row".to_string()];
    let mut columns: Vec<(usize, &[f64])> = Vec::new();
    for study in &report.studies {
        for output in &study.outputs {
            header.push(format!("{}.{}", study.label, output.name));
            columns.push((study.first_row(), output.values.as_slice()));
        }
    }
    wtr.write_record(&header)?;

    for row in 0..report.rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.to_string());
        for &(first, values) in &columns {
            let cell = row
                .checked_sub(first)
                .and_then(|k| values.get(k))
                .filter(|v| !v.is_nan())
                .map(|v| v.to_string())
                .unwrap_or_default();
            record.push(cell);
        }
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Paths written by [`save_report`].
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub dir: PathBuf,
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Writes `report.json` and `report.csv` under `output_dir/<fingerprint prefix>/`.
pub fn save_report(report: &BatchReport, output_dir: &Path) -> Result<ReportPaths> {
    let prefix = report.fingerprint.get(..12).unwrap_or(&report.fingerprint);
    let dir = output_dir.join(format!("batch_{prefix}"));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let json = dir.join("report.json");
    std::fs::write(&json, export_json(report)?)
        .with_context(|| format!("failed to write {}", json.display()))?;

    let csv = dir.join("report.csv");
    std::fs::write(&csv, export_csv(report)?)
        .with_context(|| format!("failed to write {}", csv.display()))?;

    Ok(ReportPaths { dir, json, csv })
}
