//! Listing pipeline outputs that match a glob pattern

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::core::error::CompareError;

/// Files produced by one pipeline step, in directory listing order
pub type FileSet = Vec<PathBuf>;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Collect the regular files under `root` whose path relative to `root`
/// matches `pattern`.
///
/// `*` and `?` never cross a `/` and never match a leading `.`. Symlinks are
/// followed. The result keeps the order in which the filesystem lists
/// entries; it is not sorted.
///
/// # Arguments
/// * `root` - Results directory of one pipeline version
/// * `pattern` - Glob relative to `root`, e.g. `polya/*trimmed*`
///
/// # Returns
/// Matching file paths, each prefixed with `root`. A pattern whose directory
/// does not exist yields an empty set.
pub fn collect_matching_files(root: &Path, pattern: &str) -> Result<FileSet, CompareError> {
    if !root.is_dir() {
        return Err(CompareError::MissingRoot {
            root: root.to_path_buf(),
        });
    }

    let normalized = normalize_pattern(pattern);
    let glob = Pattern::new(&normalized).map_err(|source| CompareError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let (prefix, remaining_depth) = split_literal_prefix(&normalized);
    let start = root.join(&prefix);
    if !start.is_dir() {
        debug!(directory = %start.display(), "pattern directory does not exist");
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(&start).min_depth(1).follow_links(true);
    if let Some(depth) = remaining_depth {
        walker = walker.max_depth(depth);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| CompareError::Listing {
            root: start.clone(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if glob.matches_with(&to_slash(relative), MATCH_OPTIONS) {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), pattern, count = files.len(), "collected files");
    Ok(files)
}

/// Drop `.` and empty components so the pattern lines up with the
/// normalized relative paths it is matched against (`./a//*` becomes `a/*`).
fn normalize_pattern(pattern: &str) -> String {
    pattern
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Split off the leading directories of `pattern` that contain no wildcard.
/// Returns that prefix and how many levels below it the pattern reaches
/// (`None` for `**`).
fn split_literal_prefix(pattern: &str) -> (PathBuf, Option<usize>) {
    let components: Vec<&str> = pattern.split('/').filter(|c| !c.is_empty()).collect();
    let Some((_, directories)) = components.split_last() else {
        return (PathBuf::new(), Some(1));
    };

    let literal = directories
        .iter()
        .take_while(|c| !c.contains(['*', '?', '[']))
        .count();
    let prefix: PathBuf = components[..literal].iter().collect();

    if pattern.contains("**") {
        (prefix, None)
    } else {
        (prefix, Some(components.len() - literal))
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
