//! Resolves a configuration into a [`BundlePlan`]
//!
//! Handles core file lookup, candidate filtering and ordering.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::{FileOrder, StitchConfig};
use crate::core::BundlePlan;
use crate::error::{BundleError, Result};
use crate::fs::list_directory;

/// Plans a run: finds the core file and the ordered candidates.
///
/// Nothing is written. Fails when the source directory cannot be listed, the
/// core file is not one of its entries, or the bundle would replace the core.
pub fn plan_bundle(config: &StitchConfig) -> Result<BundlePlan> {
    config.validate()?;

    let entries = list_directory(&config.source_dir)?;
    debug!("Listed {} entries in {:?}", entries.len(), config.source_dir);

    let core = config.source_dir.join(&config.core_file);
    if !core.is_file() {
        return Err(BundleError::CoreFileNotFound {
            core_file: config.core_file.clone(),
            source_dir: config.source_dir.clone(),
        });
    }

    let output = config.output_path();
    let excluded_output = output_inside_source(config);
    if excluded_output.as_deref() == Some(config.core_file.as_str()) {
        return Err(BundleError::InvalidConfig(format!(
            "output {:?} would overwrite the core file", output
        )));
    }

    let mut candidates: Vec<PathBuf> = entries
        .into_iter()
        .filter(|path| is_candidate(path, config, excluded_output.as_deref()))
        .collect();

    if config.order == FileOrder::Sorted {
        candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }

    Ok(BundlePlan {
        core,
        candidates,
        output,
    })
}

fn is_candidate(path: &Path, config: &StitchConfig, excluded: Option<&str>) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let Some(name) = name.to_str() else {
        warn!("Skipping entry with non UTF-8 name: {:?}", path);
        return false;
    };

    if !name.ends_with(&config.extension) || name == config.core_file {
        return false;
    }
    if excluded == Some(name) {
        debug!("Skipping previous bundle {:?}", path);
        return false;
    }
    // Follows symlinks; directories and dangling links drop out here
    if !path.is_file() {
        debug!("Skipping non-file entry {:?}", path);
        return false;
    }
    true
}

/// Name of the bundle when it would land inside the source directory.
fn output_inside_source(config: &StitchConfig) -> Option<String> {
    let source = config.source_dir.canonicalize().ok()?;
    let output_dir = config.output_dir.canonicalize().ok()?;
    (source == output_dir).then(|| config.output_file.clone())
}
