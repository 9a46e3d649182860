//! Rendering of bucket results

use crate::bucket::{BucketRegistry, Cell, Results};
use crate::error::CliError;
use crossterm::style::{style, Stylize};
use std::io::Write;

const COLUMN_GAP: &str = "  ";

/// Output format for `dig`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned tables
    #[default]
    Human,
    /// A JSON array of results
    Json,
}

/// Write `results` to `out` in the chosen format.
pub fn write_results(
    out: &mut impl Write,
    results: &[Results],
    format: OutputFormat,
    color: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Human => out.write_all(render_human(results, color).as_bytes())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, results)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Render every result as a titled table followed by its comments.
pub fn render_human(results: &[Results], color: bool) -> String {
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let title = format!("### {} ###", result.bucket.to_uppercase());
        out.push_str(&emphasize(&title, color));
        out.push('\n');

        out.push_str(&render_table(&result.headers, &result.rows, color));

        for comment in &result.comments {
            out.push_str(comment);
            out.push('\n');
        }
    }
    out
}

/// Left-aligned columns separated by two spaces. Headers are upper-cased.
pub fn render_table(headers: &[String], rows: &[Vec<Cell>], color: bool) -> String {
    if headers.is_empty() && rows.is_empty() {
        return String::new();
    }

    let headers: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);
    let mut widths = vec![0; columns];
    for line in std::iter::once(&headers).chain(rows.iter()) {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    if !headers.is_empty() {
        out.push_str(&emphasize(&format_line(&headers, &widths), color));
        out.push('\n');
    }
    for row in &rows {
        out.push_str(&format_line(row, &widths));
        out.push('\n');
    }
    out
}

/// Table of every registered bucket, for `ls`.
pub fn bucket_listing(registry: &BucketRegistry) -> Results {
    let mut results = Results::new("buckets");
    results.set_headers(["name", "aliases", "description", "sideEffects", "requireClient"]);
    for spec in registry.specs() {
        results.add_row(vec![
            Cell::from(spec.name),
            Cell::from(spec.aliases.iter().map(|a| a.to_string()).collect::<Vec<_>>()),
            Cell::from(spec.description),
            Cell::from(spec.side_effects.to_string()),
            Cell::from(spec.require_client.to_string()),
        ]);
    }
    results
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        line.push_str(cell);
        if i < last {
            let pad = widths[i].saturating_sub(cell.chars().count());
            line.extend(std::iter::repeat(' ').take(pad));
            line.push_str(COLUMN_GAP);
        }
    }
    line
}

fn emphasize(text: &str, color: bool) -> String {
    if color {
        style(text).bold().to_string()
    } else {
        text.to_string()
    }
}
