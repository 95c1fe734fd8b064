//! Error taxonomy for a bundling run

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a run. None of these are retried.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The configuration cannot describe a valid run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The source directory is missing or cannot be listed.
    #[error("cannot read source directory {path:?}")]
    SourceDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The core file is not an entry of the source directory.
    #[error("core file {core_file:?} not found in {source_dir:?}")]
    CoreFileNotFound {
        core_file: String,
        source_dir: PathBuf,
    },

    /// A core or candidate file failed while being streamed.
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output file could not be created, written or moved into place.
    #[error("failed to write bundle {path:?}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BundleError {
    /// True for the FileNotFoundError half of the taxonomy.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CoreFileNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
