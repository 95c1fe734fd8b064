//! Core types shared across stitch modules

use std::path::PathBuf;

/// Everything a run will touch, resolved before any output is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePlan {
    /// Core file, copied first and in full
    pub core: PathBuf,
    /// Candidate files in the order they are appended
    pub candidates: Vec<PathBuf>,
    /// Final location of the bundle
    pub output: PathBuf,
}

impl BundlePlan {
    pub fn file_count(&self) -> usize {
        self.candidates.len() + 1
    }
}

/// What one candidate file added to the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub path: PathBuf,
    /// Lines written after the header
    pub lines_kept: usize,
    /// Header lines dropped; below `header_len` when the file was short
    pub lines_skipped: usize,
    /// Bytes written, separator excluded
    pub bytes: u64,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub output: PathBuf,
    pub core_bytes: u64,
    pub contributions: Vec<Contribution>,
    /// Size of the bundle on disk
    pub total_bytes: u64,
}

impl BundleReport {
    pub fn new(output: PathBuf, core_bytes: u64, contributions: Vec<Contribution>) -> Self {
        // One separator byte per candidate
        let total_bytes = core_bytes + contributions.iter().map(|c| c.bytes + 1).sum::<u64>();
        Self {
            output,
            core_bytes,
            contributions,
            total_bytes,
        }
    }

    pub fn file_count(&self) -> usize {
        self.contributions.len() + 1
    }
}
