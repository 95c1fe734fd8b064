use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{BundleError, Result};

/// Name of the config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "stitch.toml";

/// Order in which candidate files follow the core file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOrder {
    /// Byte-wise by file name, reproducible across platforms
    #[default]
    Sorted,
    /// Whatever the directory enumeration returns
    Listing,
}

/// Main configuration for a bundling run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Leading lines dropped from every candidate file
    pub header_len: usize,
    /// File copied first and in full
    pub core_file: String,
    /// Name of the generated bundle
    pub output_file: String,
    /// Directory scanned for the core and candidate files
    pub source_dir: PathBuf,
    /// Directory the bundle is written to; must already exist
    pub output_dir: PathBuf,
    /// Suffix a file name needs to be bundled (e.g. ".js")
    pub extension: String,
    /// Candidate ordering policy
    pub order: FileOrder,
    /// Debug-level logging
    #[serde(skip)]
    pub verbose: bool,
}

impl StitchConfig {
    /// Full path of the bundle this config produces.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    /// Rejects configurations that cannot describe a run, before touching the disk.
    pub fn validate(&self) -> Result<()> {
        if self.extension.is_empty() {
            return Err(BundleError::InvalidConfig("extension must not be empty".to_string()));
        }
        check_file_name("core_file", &self.core_file)?;
        check_file_name("output_file", &self.output_file)?;
        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// Returns `Ok(None)` when the file does not exist; a file that exists but
    /// does not parse is an error.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(Some(config))
    }
}

/// Core and output names are plain entry names, never paths.
fn check_file_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BundleError::InvalidConfig(format!("{} must not be empty", field)));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(BundleError::InvalidConfig(format!(
            "{} must be a file name, got {:?}", field, name
        )));
    }
    Ok(())
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            header_len: 16,
            core_file: "KetteringJS-Core.js".to_string(),
            output_file: "KetteringJS.js".to_string(),
            source_dir: PathBuf::from("js"),
            output_dir: PathBuf::from("bin"),
            extension: ".js".to_string(),
            order: FileOrder::Sorted,
            verbose: false,
        }
    }
}
