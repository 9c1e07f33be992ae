//! Drives a full comparison run over every stage of a plan

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::io::Write;
use tracing::{info, warn};

use super::comparator::Comparator;
use crate::config::ComparisonPlan;
use crate::reporting::report_writer::{ReportWriter, StageReport};
use crate::scanner::file_scanner::collect_matching_files;

/// Build the comparator described by a plan
pub fn comparator_for(plan: &ComparisonPlan) -> Comparator {
    Comparator::new(plan.algorithm, plan.on_missing_candidate)
}

/// Run every comparison of `plan` in order, writing each result as soon as
/// it is known.
///
/// The first unreadable file, listing failure or (under the abort policy)
/// missing candidate ends the run with an error naming the path. Mismatches
/// are never errors.
pub fn run_plan<W: Write>(
    plan: &ComparisonPlan,
    comparator: &Comparator,
    reporter: &mut ReportWriter<W>,
    progress: &ProgressBar,
) -> Result<Vec<StageReport>> {
    let mut sections = Vec::with_capacity(plan.comparison_count());

    for stage in &plan.stages {
        progress
            .suspend(|| reporter.stage_header(&stage.name))
            .context("Failed to write report")?;

        for entry in &stage.comparisons {
            progress
                .suspend(|| reporter.label_header(&entry.label))
                .context("Failed to write report")?;

            let references = collect_matching_files(&plan.reference_root, &entry.reference)?;
            let candidates = collect_matching_files(&plan.candidate_root, &entry.candidate)?;
            info!(
                stage = %stage.name,
                label = %entry.label,
                references = references.len(),
                candidates = candidates.len(),
                "comparing"
            );
            if references.is_empty() {
                warn!(pattern = %entry.reference, "no reference files matched");
            }

            let mut results = Vec::with_capacity(references.len());
            for reference in &references {
                progress.set_message(format!("{} / {}", stage.name, entry.label));
                let result = comparator.compare_file(reference, &candidates, entry.presort_lines)?;
                progress
                    .suspend(|| reporter.write_result(&result))
                    .context("Failed to write report")?;
                progress.inc(1);
                results.push(result);
            }

            sections.push(StageReport {
                stage: stage.name.clone(),
                label: entry.label.clone(),
                presort_lines: entry.presort_lines,
                results,
            });
        }
    }

    Ok(sections)
}
