use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::analysis::CoordinationReport;
use crate::data::model::ShellPoint;

/// Output sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Human-readable table and result panel.
    #[default]
    Text,
    /// The full report as JSON.
    Json,
}

/// Render `report` to `out`.
pub fn write_report(
    out: &mut impl Write,
    report: &CoordinationReport,
    format: Format,
    banner: bool,
) -> Result<()> {
    match format {
        Format::Text => {
            if banner {
                writeln!(out, "{}", banner_panel(report))?;
            }
            writeln!(out, "{}", points_table(&report.points)?)?;
            writeln!(out, "{}", result_panel(report.coordination_number))?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, report).context("serializing report")?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Text pieces
// ---------------------------------------------------------------------------

/// Filtered points, both columns to two decimals.
pub fn points_table(points: &[ShellPoint]) -> Result<String> {
    let r: Vec<String> = points.iter().map(|p| format!("{:.2}", p.r)).collect();
    let w: Vec<String> = points.iter().map(|p| format!("{:.2}", p.integrand)).collect();

    let batch = RecordBatch::try_from_iter(vec![
        ("r", Arc::new(StringArray::from(r)) as ArrayRef),
        ("g(r)·4πr²", Arc::new(StringArray::from(w)) as ArrayRef),
    ])
    .context("building points table")?;

    Ok(pretty_format_batches(&[batch])
        .context("formatting points table")?
        .to_string())
}

/// Framed coordination number, four decimals.
pub fn result_panel(coordination_number: f64) -> String {
    panel(
        "Result",
        &[format!("Coordination number: {coordination_number:.4}")],
    )
}

fn banner_panel(report: &CoordinationReport) -> String {
    let mut lines = Vec::new();
    if let Some(source) = &report.source {
        lines.push(format!("File:    {}", source.display()));
    }
    if let Some(sheet) = &report.sheet {
        lines.push(format!("Sheet:   {sheet}"));
    }
    lines.push(format!("Window:  r ∈ {} Å", report.window));
    lines.push(format!(
        "Solvent: {} g/cm³, {} g/mol → {:.6} Å⁻³",
        report.density.mass_density, report.density.molar_mass, report.density.per_cubic_angstrom
    ));
    lines.push(format!("Rule:    {:?} (even counts: {:?})", report.method, report.even_policy));
    panel("Coordination number from g(r)", &lines)
}

/// Box-drawn panel with a title in the top border.
fn panel(title: &str, lines: &[String]) -> String {
    let width = lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.chars().count() + 2))
        .max()
        .unwrap_or(0)
        + 2;

    let title_len = title.chars().count() + 2;
    let mut s = format!("╭─ {title} {}╮\n", "─".repeat(width.saturating_sub(title_len + 1)));
    for line in lines {
        let pad = width - line.chars().count() - 1;
        s.push_str(&format!("│ {line}{}│\n", " ".repeat(pad)));
    }
    s.push_str(&format!("╰{}╯", "─".repeat(width)));
    s
}
