//! Pipeline output comparison library
//!
//! Pairs the output files of a legacy pipeline with those of its
//! reimplementation by fuzzy file-name matching, then compares their
//! (optionally decompressed and line-sorted) content digests.

pub mod config;
pub mod core;
pub mod reporting;
pub mod scanner;

pub use crate::core::comparator;
pub use crate::reporting::report_writer;
pub use crate::scanner::file_scanner;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ComparisonPlan, Stage, StageComparison};
    pub use crate::core::comparator::{Comparator, ComparisonResult, MissingCandidate};
    pub use crate::core::digest::DigestAlgorithm;
    pub use crate::core::error::CompareError;
    pub use crate::core::loader::{load_normalized, load_text, presort_lines};
    pub use crate::core::matcher::{best_match, longest_common_substring};
    pub use crate::core::runner::{comparator_for, run_plan};
    pub use crate::reporting::report_writer::{
        format_result, truncate_path, write_json_report, ReportWriter, StageReport,
        DEFAULT_DISPLAY_WIDTH,
    };
    pub use crate::scanner::file_scanner::{collect_matching_files, FileSet};
}
