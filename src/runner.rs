use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use log::{debug, info};

use crate::config::StitchConfig;
use crate::core::concat::{copy_after_header, copy_verbatim};
use crate::core::{BundlePlan, BundleReport, Contribution, plan_bundle};
use crate::error::{BundleError, Result};
use crate::fs::AtomicOutput;

/// Main entry point: plans the run and writes the bundle.
pub fn run(config: &StitchConfig) -> Result<BundleReport> {
    let plan = plan_bundle(config)?;
    info!(
        "Bundling {} files from {:?} into {:?}",
        plan.file_count(),
        config.source_dir,
        plan.output
    );
    bundle(&plan, config.header_len)
}

/// Writes the bundle described by `plan`.
///
/// The core file goes first, verbatim. Every candidate follows behind a single
/// blank line with its first `header_len` lines removed. The separator is
/// written even when nothing of the candidate survives the header.
pub fn bundle(plan: &BundlePlan, header_len: usize) -> Result<BundleReport> {
    let mut output = TrackedWriter::new(AtomicOutput::create(&plan.output)?);

    let core_bytes = {
        let mut input = open(&plan.core)?;
        copy_verbatim(&mut input, &mut output)
            .map_err(|source| copy_err(&plan.core, &plan.output, output.failed, source))?
    };
    debug!("Copied core {:?} ({} bytes)", plan.core, core_bytes);

    let mut contributions = Vec::with_capacity(plan.candidates.len());
    for path in &plan.candidates {
        output.write_all(b"\n").map_err(|source| BundleError::Output {
            path: plan.output.clone(),
            source,
        })?;

        let mut input = open(path)?;
        let stats = copy_after_header(&mut input, &mut output, header_len)
            .map_err(|source| copy_err(path, &plan.output, output.failed, source))?;
        debug!(
            "Appended {:?}: kept {} lines, skipped {}",
            path, stats.lines_kept, stats.lines_skipped
        );

        contributions.push(Contribution {
            path: path.clone(),
            lines_kept: stats.lines_kept,
            lines_skipped: stats.lines_skipped,
            bytes: stats.bytes,
        });
    }

    let written = output.inner.commit()?;
    let report = BundleReport::new(written, core_bytes, contributions);
    info!("Wrote {:?} ({} bytes)", report.output, report.total_bytes);
    Ok(report)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| BundleError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Writer that remembers whether the write side ever failed.
///
/// A copy surfaces read and write errors through the same `io::Error`; the
/// flag tells which file to blame.
#[derive(Debug)]
struct TrackedWriter<W> {
    inner: W,
    failed: bool,
}

impl<W: Write> TrackedWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            failed: false,
        }
    }
}

impl<W: Write> Write for TrackedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.inner.write(buf) {
            // write_all turns this into WriteZero
            Ok(0) if !buf.is_empty() => {
                self.failed = true;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().inspect_err(|_| self.failed = true)
    }
}

fn copy_err(input: &Path, output: &Path, write_failed: bool, source: io::Error) -> BundleError {
    if write_failed {
        BundleError::Output {
            path: output.to_path_buf(),
            source,
        }
    } else {
        BundleError::Read {
            path: input.to_path_buf(),
            source,
        }
    }
}
