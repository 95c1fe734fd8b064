//! Core module for stitch
//!
//! Planning and line streaming for a bundling run.

pub mod concat;
pub mod scanner;
mod types;

pub use scanner::plan_bundle;
pub use types::*;
