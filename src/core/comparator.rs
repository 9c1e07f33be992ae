//! Pairwise comparison of reference and candidate file sets

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::digest::DigestAlgorithm;
use super::error::CompareError;
use super::loader::load_normalized;
use super::matcher::best_match;

/// What to do when a reference file has no candidate to compare against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingCandidate {
    /// Report the reference file as unresolved and keep going
    #[default]
    Unresolved,
    /// Fail the whole run
    Abort,
}

/// Outcome of comparing one reference file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub reference: PathBuf,
    pub reference_digest: String,
    pub candidate: Option<PathBuf>,
    pub candidate_digest: Option<String>,
    pub matched: bool,
}

impl ComparisonResult {
    /// True if no candidate was available for this reference file
    pub fn is_unresolved(&self) -> bool {
        self.candidate.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    algorithm: DigestAlgorithm,
    on_missing: MissingCandidate,
}

impl Comparator {
    pub fn new(algorithm: DigestAlgorithm, on_missing: MissingCandidate) -> Self {
        Self { algorithm, on_missing }
    }

    /// Digest a file after loading and normalizing it
    pub fn file_digest(&self, path: &Path, presort: bool) -> Result<String, CompareError> {
        let text = load_normalized(path, presort)?;
        Ok(self.algorithm.digest_text(&text))
    }

    /// Compare one reference file with its closest candidate.
    ///
    /// The reference is read before the candidate is chosen, so an unreadable
    /// reference fails even when there are no candidates.
    pub fn compare_file(
        &self,
        reference: &Path,
        candidates: &[PathBuf],
        presort: bool,
    ) -> Result<ComparisonResult, CompareError> {
        let reference_digest = self.file_digest(reference, presort)?;

        let candidate = match best_match(reference, candidates) {
            Ok(candidate) => candidate,
            Err(CompareError::NoCandidate { .. }) if self.on_missing == MissingCandidate::Unresolved => {
                warn!(reference = %reference.display(), "no candidate file to compare against");
                return Ok(ComparisonResult {
                    reference: reference.to_path_buf(),
                    reference_digest,
                    candidate: None,
                    candidate_digest: None,
                    matched: false,
                });
            }
            Err(e) => return Err(e),
        };
        debug!(
            reference = %reference.display(),
            candidate = %candidate.display(),
            "paired files"
        );

        let candidate_digest = self.file_digest(candidate, presort)?;
        let matched = reference_digest == candidate_digest;

        Ok(ComparisonResult {
            reference: reference.to_path_buf(),
            reference_digest,
            candidate: Some(candidate.to_path_buf()),
            candidate_digest: Some(candidate_digest),
            matched,
        })
    }

    /// Compare every reference file, in listing order.
    ///
    /// Stops at the first error.
    pub fn compare_sets(
        &self,
        references: &[PathBuf],
        candidates: &[PathBuf],
        presort: bool,
    ) -> Result<Vec<ComparisonResult>, CompareError> {
        references
            .iter()
            .map(|reference| self.compare_file(reference, candidates, presort))
            .collect()
    }
}
