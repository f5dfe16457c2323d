use std::io::Write;

use anyhow::{Context, Result};

use crate::cli::{OutputFormat, ReportOrder};
use crate::model::{MergedIndex, ReportEntry};

/// Keeps words with fewer than `limit` references, in the requested order.
pub fn build_report(merged: &MergedIndex, limit: usize, order: ReportOrder) -> Vec<ReportEntry> {
    let mut entries: Vec<ReportEntry> = merged
        .iter()
        .filter(|(_, references)| references.len() < limit)
        .map(|(word, references)| ReportEntry {
            word: word.to_string(),
            references: references.to_vec(),
        })
        .collect();

    if matches!(order, ReportOrder::Alphabetical) {
        entries.sort_by(|a, b| a.word.cmp(&b.word));
    }

    entries
}

pub fn write_report(
    entries: &[ReportEntry],
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(entries, out),
        OutputFormat::Json => write_json(entries, out),
    }
}

fn write_text(entries: &[ReportEntry], out: &mut dyn Write) -> Result<()> {
    for entry in entries {
        writeln!(out, "{}: {}", entry.word, entry.references.join(", "))
            .context("failed to write index line")?;
    }
    out.flush().context("failed to flush index output")
}

fn write_json(entries: &[ReportEntry], out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, entries).context("failed to serialize index json")?;
    out.write_all(b"\n").context("failed to finalize index json")?;
    out.flush().context("failed to flush index output")
}
