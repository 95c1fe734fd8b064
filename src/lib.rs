pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod runner;

// Re-export key items for convenience
pub use crate::config::{FileOrder, StitchConfig};
pub use crate::core::{BundlePlan, BundleReport, Contribution, plan_bundle};
pub use crate::error::BundleError;
pub use crate::runner::{bundle, run};
