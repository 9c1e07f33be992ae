//! Content loading and normalization
//!
//! Files are read fully into memory as text. Names ending in `.gz` are
//! decompressed on the fly (concatenated gzip members included, so bgzip
//! output reads the same as plain gzip).

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::error::CompareError;

/// Suffix that marks a gzip-compressed file
pub const GZIP_SUFFIX: &str = ".gz";

/// Returns true if `path` names a gzip-compressed file
pub fn is_compressed(path: &Path) -> bool {
    path.to_string_lossy().ends_with(GZIP_SUFFIX)
}

/// Read a file as text, decompressing it if needed.
///
/// Line endings are normalized: `\r\n` and lone `\r` become `\n`.
///
/// # Errors
/// `CompareError::Io` when the file cannot be opened, read or decompressed,
/// `CompareError::Encoding` when the content is not valid UTF-8.
pub fn load_text(path: &Path) -> Result<String, CompareError> {
    let bytes = read_bytes(path).map_err(|source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let text = String::from_utf8(bytes).map_err(|_| CompareError::Encoding {
        path: path.to_path_buf(),
    })?;

    debug!(path = %path.display(), bytes = text.len(), "loaded file");
    Ok(translate_newlines(text))
}

/// Load a file and apply the requested normalization
pub fn load_normalized(path: &Path, presort: bool) -> Result<String, CompareError> {
    let text = load_text(path)?;
    Ok(if presort { presort_lines(&text) } else { text })
}

/// Sort the lines of `text` so that row order no longer matters.
///
/// Splits on `\n` (a trailing newline yields an empty last piece, which
/// sorts first) and joins back with `\n`.
pub fn presort_lines(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    lines.sort_unstable();
    lines.join("\n")
}

fn read_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();

    if is_compressed(path) {
        MultiGzDecoder::new(file).read_to_end(&mut bytes)?;
    } else {
        file.read_to_end(&mut bytes)?;
    }

    Ok(bytes)
}

fn translate_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
