//! Report writing functionality

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::core::comparator::ComparisonResult;

/// Characters of each path shown on a result line unless configured otherwise
pub const DEFAULT_DISPLAY_WIDTH: usize = 40;

pub const MATCH_MARKER: &str = "✓";
pub const MISMATCH_MARKER: &str = "✗";
pub const UNRESOLVED_MARKER: &str = "?";

/// Line-oriented report of comparison results
pub struct ReportWriter<W: Write> {
    out: W,
    display_width: usize,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, display_width: usize) -> Self {
        Self { out, display_width }
    }

    pub fn stage_header(&mut self, stage: &str) -> io::Result<()> {
        writeln!(self.out, "=== {} ===", stage)
    }

    pub fn label_header(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "--- {} ---", label)
    }

    /// Write one result line and flush it, so progress is visible even if a
    /// later file aborts the run.
    pub fn write_result(&mut self, result: &ComparisonResult) -> io::Result<()> {
        writeln!(self.out, "{}", format_result(result, self.display_width))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render a result as
/// `<marker> - Comparing ...<ref> (<digest>) and ...<candidate> (<digest>)`
pub fn format_result(result: &ComparisonResult, width: usize) -> String {
    let reference = truncate_path(&result.reference, width);

    match (&result.candidate, &result.candidate_digest) {
        (Some(candidate), Some(candidate_digest)) => format!(
            "{} - Comparing {} ({}) and {} ({})",
            if result.matched { MATCH_MARKER } else { MISMATCH_MARKER },
            reference,
            result.reference_digest,
            truncate_path(candidate, width),
            candidate_digest,
        ),
        _ => format!(
            "{} - No candidate for {} ({})",
            UNRESOLVED_MARKER, reference, result.reference_digest
        ),
    }
}

/// Last `width` characters of `path`, prefixed with `...`.
/// Shorter paths are shown whole, still with the prefix.
pub fn truncate_path(path: &Path, width: usize) -> String {
    let text = path.to_string_lossy();
    let skip = text.chars().count().saturating_sub(width);
    let tail: String = text.chars().skip(skip).collect();
    format!("...{}", tail)
}

/// Results of one comparison entry of a stage
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub label: String,
    pub presort_lines: bool,
    pub results: Vec<ComparisonResult>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    algorithm: String,
    matched: usize,
    mismatched: usize,
    unresolved: usize,
    sections: &'a [StageReport],
}

/// Write all results as pretty-printed JSON
///
/// # Arguments
/// * `output_path` - Path to output file
/// * `algorithm` - Name of the digest algorithm used
/// * `sections` - Results grouped by stage and label
pub fn write_json_report(output_path: &Path, algorithm: &str, sections: &[StageReport]) -> Result<()> {
    let results = || sections.iter().flat_map(|s| s.results.iter());
    let unresolved = results().filter(|r| r.is_unresolved()).count();
    let matched = results().filter(|r| r.matched).count();
    let mismatched = results().count() - matched - unresolved;

    let report = JsonReport {
        algorithm: algorithm.to_string(),
        matched,
        mismatched,
        unresolved,
        sections,
    };

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create report file {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).context("Failed to write JSON report")?;
    writer.flush().context("Failed to write JSON report")?;
    Ok(())
}
