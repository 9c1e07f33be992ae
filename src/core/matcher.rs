//! Fuzzy file-name matching
//!
//! Pairs a reference file with the candidate whose base name shares the
//! longest contiguous run of characters with it. When several candidates
//! reach the same longest run, the one sharing more characters overall
//! (sum of all non-overlapping common blocks) wins, and any remaining tie
//! goes to the lexicographically greatest candidate path.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use super::error::CompareError;

/// Similarity of a candidate name to a reference name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NameScore {
    /// Length of the longest common contiguous substring
    pub longest: usize,
    /// Characters covered by all non-overlapping common blocks
    pub shared: usize,
}

/// Length of the longest common contiguous substring of `a` and `b`,
/// counted in characters.
pub fn longest_common_substring(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    longest_block(&a, &b).2
}

/// Score `candidate` against `reference` by their base names
pub fn score_names(reference: &str, candidate: &str) -> NameScore {
    let a: Vec<char> = reference.chars().collect();
    let b: Vec<char> = candidate.chars().collect();
    NameScore {
        longest: longest_block(&a, &b).2,
        shared: shared_characters(&a, &b),
    }
}

/// Pick the candidate most similar to `reference`.
///
/// The result does not depend on the order of `candidates`.
///
/// # Errors
/// `CompareError::NoCandidate` when `candidates` is empty.
pub fn best_match<'a>(reference: &Path, candidates: &'a [PathBuf]) -> Result<&'a Path, CompareError> {
    let reference_name = base_name(reference);

    candidates
        .iter()
        .map(|candidate| {
            let score = score_names(&reference_name, &base_name(candidate));
            (score, candidate.to_string_lossy(), candidate)
        })
        .max_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)))
        .map(|(_, _, candidate)| candidate.as_path())
        .ok_or_else(|| CompareError::NoCandidate {
            reference: reference.to_path_buf(),
        })
}

fn base_name(path: &Path) -> Cow<'_, str> {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default()
}

/// Longest common block as `(start_in_a, start_in_b, length)`.
/// The earliest block in `a` wins among equally long ones.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    let mut best = (0, 0, 0);

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let len = curr[j + 1];
            if len > best.2 {
                best = (i + 1 - len, j + 1 - len, len);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

fn shared_characters(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_block(a, b);
    if len == 0 {
        return 0;
    }
    len + shared_characters(&a[..i], &b[..j]) + shared_characters(&a[i + len..], &b[j + len..])
}
