//! File set collection

pub mod file_scanner;

pub use file_scanner::{collect_matching_files, FileSet};
