//! Content digests used for equality checks

use digest::Digest;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;

/// Hash algorithm applied to normalized file content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// MD5, as printed by the legacy comparison script
    #[default]
    Md5,
    Sha256,
}

impl DigestAlgorithm {
    /// Lowercase hex digest of the UTF-8 bytes of `text`
    pub fn digest_text(self, text: &str) -> String {
        match self {
            DigestAlgorithm::Md5 => format!("{:x}", Md5::digest(text.as_bytes())),
            DigestAlgorithm::Sha256 => format!("{:x}", Sha256::digest(text.as_bytes())),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Md5 => write!(f, "md5"),
            DigestAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}
