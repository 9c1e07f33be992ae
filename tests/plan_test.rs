//! End-to-end tests: plan file on disk, two results trees, text report

use flate2::write::GzEncoder;
use flate2::Compression;
use indicatif::ProgressBar;
use pipeline_compare::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn put(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    if relative.ends_with(".gz") {
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap();
    } else {
        fs::write(&path, content).unwrap();
    }
}

fn write_plan(dir: &Path, reference_root: &Path, candidate_root: &Path, extra: &str) -> std::path::PathBuf {
    let plan = format!(
        r#"
reference_root = "{}"
candidate_root = "{}"
display_width = 20
{}

[[stage]]
name = "cutadapt"

[[stage.comparison]]
label = "cutadapt"
reference = "cutadapt/*"
candidate = "cutadapt/*"

[[stage]]
name = "Remove random priming"

[[stage.comparison]]
label = "clusters"
reference = "mergedclusters/polyAclusters.bed"
candidate = "polyaclusters/merged_polya.bed"
presort_lines = true

[[stage.comparison]]
label = "annotated clusters"
reference = "mergedclusters/polyAclusters.unique.annotated.bed"
candidate = "polyaclusters/merged_polya.unique.annotated.bed"
"#,
        reference_root.display(),
        candidate_root.display(),
        extra
    );
    let path = dir.join("plan.toml");
    fs::write(&path, plan).unwrap();
    path
}

fn run(plan: &ComparisonPlan) -> anyhow::Result<(Vec<StageReport>, String)> {
    let mut reporter = ReportWriter::new(Vec::new(), plan.display_width);
    let sections = run_plan(plan, &comparator_for(plan), &mut reporter, &ProgressBar::hidden())?;
    Ok((sections, String::from_utf8(reporter.into_inner()).unwrap()))
}

#[test]
fn test_full_run_report() {
    let workspace = TempDir::new().unwrap();
    let legacy = workspace.path().join("legacy");
    let nextflow = workspace.path().join("nextflow");

    put(&legacy, "cutadapt/s1_cutadapt.fastq.gz", b"@r\nACGT\n+\nIIII\n");
    put(&nextflow, "cutadapt/s1_trimmed.fastq.gz", b"@r\nACGT\n+\nIIII\n");
    put(&legacy, "mergedclusters/polyAclusters.bed", b"chr1\t1\t5\nchr2\t2\t6\n");
    put(&nextflow, "polyaclusters/merged_polya.bed", b"chr2\t2\t6\nchr1\t1\t5\n");
    put(&legacy, "mergedclusters/polyAclusters.unique.annotated.bed", b"chr1\t1\t5\tGENE\n");
    put(&nextflow, "polyaclusters/merged_polya.unique.annotated.bed", b"chr1\t1\t5\tOTHER\n");

    let plan_path = write_plan(workspace.path(), &legacy, &nextflow, "");
    let plan = ComparisonPlan::load(&plan_path).unwrap();
    let (sections, output) = run(&plan).unwrap();

    assert_eq!(sections.len(), 3);
    assert!(sections[0].results[0].matched);
    assert!(sections[1].results[0].matched, "presorted clusters should match");
    assert!(!sections[2].results[0].matched);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "=== cutadapt ===");
    assert_eq!(lines[1], "--- cutadapt ---");
    assert!(lines[2].starts_with("✓ - Comparing ..."));
    assert_eq!(lines[3], "=== Remove random priming ===");
    assert_eq!(lines[4], "--- clusters ---");
    assert!(lines[5].starts_with("✓ "));
    assert_eq!(lines[6], "--- annotated clusters ---");
    assert!(lines[7].starts_with("✗ "));
    assert_eq!(lines.len(), 8);
}

#[test]
fn test_result_line_shows_tail_and_digests() {
    let workspace = TempDir::new().unwrap();
    let legacy = workspace.path().join("legacy");
    let nextflow = workspace.path().join("nextflow");
    put(&legacy, "cutadapt/s1.fastq.gz", b"x\n");
    put(&nextflow, "cutadapt/s1.fastq.gz", b"x\n");
    put(&legacy, "mergedclusters/polyAclusters.bed", b"x\n");
    put(&nextflow, "polyaclusters/merged_polya.bed", b"x\n");

    let plan_path = write_plan(workspace.path(), &legacy, &nextflow, "");
    let plan = ComparisonPlan::load(&plan_path).unwrap();
    let (sections, output) = run(&plan).unwrap();

    let result = &sections[0].results[0];
    let expected = format!(
        "✓ - Comparing {} ({}) and {} ({})",
        truncate_path(&result.reference, plan.display_width),
        result.reference_digest,
        truncate_path(result.candidate.as_ref().unwrap(), plan.display_width),
        result.reference_digest,
    );
    assert!(output.lines().any(|line| line == expected));
    // "cutadapt/s1.fastq.gz" is exactly 20 characters, the configured width
    assert!(expected.contains(" ...cutadapt/s1.fastq.gz ("));
    assert!(expected.contains(" and ...cutadapt/s1.fastq.gz ("));
}

#[test]
fn test_missing_candidate_directory_unresolved() {
    let workspace = TempDir::new().unwrap();
    let legacy = workspace.path().join("legacy");
    let nextflow = workspace.path().join("nextflow");
    put(&legacy, "cutadapt/s1.fastq.gz", b"x\n");
    put(&legacy, "cutadapt/s2.fastq.gz", b"y\n");
    fs::create_dir_all(&nextflow).unwrap();

    let plan_path = write_plan(workspace.path(), &legacy, &nextflow, "");
    let plan = ComparisonPlan::load(&plan_path).unwrap();
    let (sections, output) = run(&plan).unwrap();

    assert_eq!(sections[0].results.len(), 2);
    assert!(sections[0].results.iter().all(|r| r.is_unresolved()));
    assert_eq!(output.lines().filter(|l| l.starts_with("? - No candidate for ")).count(), 2);
}

#[test]
fn test_missing_candidate_directory_aborts_in_legacy_mode() {
    let workspace = TempDir::new().unwrap();
    let legacy = workspace.path().join("legacy");
    let nextflow = workspace.path().join("nextflow");
    put(&legacy, "cutadapt/s1.fastq.gz", b"x\n");
    fs::create_dir_all(&nextflow).unwrap();

    let plan_path = write_plan(
        workspace.path(),
        &legacy,
        &nextflow,
        "on_missing_candidate = \"abort\"",
    );
    let plan = ComparisonPlan::load(&plan_path).unwrap();
    assert_eq!(plan.on_missing_candidate, MissingCandidate::Abort);

    let err = run(&plan).unwrap_err();
    let compare_error = err.downcast_ref::<CompareError>().unwrap();
    assert!(matches!(compare_error, CompareError::NoCandidate { .. }));
}

#[test]
fn test_missing_root_is_fatal() {
    let workspace = TempDir::new().unwrap();
    let legacy = workspace.path().join("legacy");
    let nextflow = workspace.path().join("does-not-exist");
    put(&legacy, "cutadapt/s1.fastq.gz", b"x\n");

    let plan_path = write_plan(workspace.path(), &legacy, &nextflow, "");
    let plan = ComparisonPlan::load(&plan_path).unwrap();

    let err = run(&plan).unwrap_err();
    assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn test_unreadable_file_stops_run_after_earlier_lines() {
    let workspace = TempDir::new().unwrap();
    let legacy = workspace.path().join("legacy");
    let nextflow = workspace.path().join("nextflow");
    put(&legacy, "cutadapt/s1.fastq.gz", b"x\n");
    put(&nextflow, "cutadapt/s1.fastq.gz", b"x\n");
    put(&legacy, "mergedclusters/polyAclusters.bed", &[0xff, 0xfe, 0x00]);
    put(&nextflow, "polyaclusters/merged_polya.bed", b"x\n");

    let plan_path = write_plan(workspace.path(), &legacy, &nextflow, "");
    let plan = ComparisonPlan::load(&plan_path).unwrap();

    let mut reporter = ReportWriter::new(Vec::new(), plan.display_width);
    let err = run_plan(&plan, &comparator_for(&plan), &mut reporter, &ProgressBar::hidden()).unwrap_err();
    assert!(err.to_string().contains("polyAclusters.bed"));

    let output = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(output.lines().any(|l| l.starts_with("✓ ")));
}

#[test]
fn test_json_report_written() {
    let workspace = TempDir::new().unwrap();
    let legacy = workspace.path().join("legacy");
    let nextflow = workspace.path().join("nextflow");
    put(&legacy, "cutadapt/s1.fastq.gz", b"x\n");
    put(&nextflow, "cutadapt/s1.fastq.gz", b"y\n");

    let plan_path = write_plan(workspace.path(), &legacy, &nextflow, "algorithm = \"sha256\"");
    let plan = ComparisonPlan::load(&plan_path).unwrap();
    let (sections, _) = run(&plan).unwrap();

    let json_path = workspace.path().join("report.json");
    write_json_report(&json_path, &plan.algorithm.to_string(), &sections).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["algorithm"], "sha256");
    assert_eq!(value["mismatched"], 1);
    assert_eq!(value["sections"][0]["stage"], "cutadapt");
    assert_eq!(
        value["sections"][0]["results"][0]["reference_digest"].as_str().unwrap().len(),
        64
    );
}
