//! Comparison plan loaded from a TOML file
//!
//! A plan names the two results roots and lists the pipeline stages to
//! compare. Each stage holds one or more glob pairs:
//!
//! ```toml
//! reference_root = "legacy/results"
//! candidate_root = "nextflow/results"
//!
//! [[stage]]
//! name = "cutadapt"
//!
//! [[stage.comparison]]
//! label = "cutadapt"
//! reference = "cutadapt/*"
//! candidate = "cutadapt/*"
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::comparator::MissingCandidate;
use crate::core::digest::DigestAlgorithm;
use crate::reporting::report_writer::DEFAULT_DISPLAY_WIDTH;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonPlan {
    /// Results directory of the legacy pipeline
    pub reference_root: PathBuf,
    /// Results directory of the reimplementation
    pub candidate_root: PathBuf,
    /// Trailing characters of each path shown per result line
    #[serde(default = "default_display_width")]
    pub display_width: usize,
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
    #[serde(default)]
    pub on_missing_candidate: MissingCandidate,
    #[serde(default, rename = "stage")]
    pub stages: Vec<Stage>,
}

/// One pipeline step, printed as `=== name ===`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stage {
    pub name: String,
    #[serde(default, rename = "comparison")]
    pub comparisons: Vec<StageComparison>,
}

/// A reference/candidate glob pair, printed as `--- label ---`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageComparison {
    pub label: String,
    /// Glob relative to `reference_root`
    pub reference: String,
    /// Glob relative to `candidate_root`
    pub candidate: String,
    /// Sort lines before hashing, for outputs with meaningless row order
    #[serde(default)]
    pub presort_lines: bool,
}

fn default_display_width() -> usize {
    DEFAULT_DISPLAY_WIDTH
}

impl ComparisonPlan {
    /// Load and validate a plan file
    pub fn load(path: &Path) -> Result<Self> {
        let toml_string = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&toml_string)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(toml_string: &str) -> Result<Self> {
        let plan: ComparisonPlan = toml::from_str(toml_string).context("Failed to parse TOML")?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn validate(&self) -> Result<()> {
        if self.display_width == 0 {
            bail!("display_width must be greater than zero");
        }
        if self.stages.is_empty() {
            bail!("no [[stage]] entries defined");
        }
        for stage in &self.stages {
            if stage.name.trim().is_empty() {
                bail!("stage with an empty name");
            }
            if stage.comparisons.is_empty() {
                bail!("stage `{}` has no [[stage.comparison]] entries", stage.name);
            }
            for comparison in &stage.comparisons {
                if comparison.reference.trim().is_empty() || comparison.candidate.trim().is_empty() {
                    bail!(
                        "comparison `{}` in stage `{}` has an empty glob",
                        comparison.label,
                        stage.name
                    );
                }
            }
        }
        Ok(())
    }

    /// Total number of glob pairs across all stages
    pub fn comparison_count(&self) -> usize {
        self.stages.iter().map(|s| s.comparisons.len()).sum()
    }
}
