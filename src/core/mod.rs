//! Core comparison logic

pub mod comparator;
pub mod digest;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod runner;

pub use comparator::{Comparator, ComparisonResult, MissingCandidate};
pub use digest::DigestAlgorithm;
pub use error::CompareError;
