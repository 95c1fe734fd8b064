use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::error::{BundleError, Result};

/// Lists the entries of `dir` in the order the filesystem returns them.
///
/// Only the listing itself is checked here; entries are not stat'ed.
pub fn list_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let source_err = |source: io::Error| BundleError::SourceDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(source_err)? {
        entries.push(entry.map_err(source_err)?.path());
    }
    Ok(entries)
}

/// Bundle output that only appears at its final path once fully written.
///
/// Content goes to a temporary file next to the destination and is renamed
/// over it in [`AtomicOutput::commit`]. Dropping without committing deletes the
/// temporary file and leaves any previous bundle untouched.
///
/// A target that is a symlink is written through: the file it points at is
/// replaced and the link stays. A replaced bundle keeps its permissions; a new
/// one gets 0644 on unix, whatever the umask.
#[derive(Debug)]
pub struct AtomicOutput {
    writer: BufWriter<NamedTempFile>,
    target: PathBuf,
    destination: PathBuf,
}

impl AtomicOutput {
    pub fn create(target: &Path) -> Result<Self> {
        let destination = resolve_destination(target);
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(|source| BundleError::Output {
            path: target.to_path_buf(),
            source,
        })?;
        debug!("Writing bundle through {:?}", temp.path());

        Ok(Self {
            writer: BufWriter::new(temp),
            target: target.to_path_buf(),
            destination,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Flushes and moves the finished bundle onto the target path.
    pub fn commit(self) -> Result<PathBuf> {
        let target = self.target;
        let output_err = |source: io::Error| BundleError::Output {
            path: target.clone(),
            source,
        };

        let temp = self.writer.into_inner().map_err(|e| output_err(e.into_error()))?;
        temp.as_file().sync_all().map_err(output_err)?;
        let permissions = match fs::metadata(&self.destination) {
            Ok(existing) => existing.permissions(),
            Err(_) => default_permissions(&temp).map_err(output_err)?,
        };
        temp.as_file().set_permissions(permissions).map_err(output_err)?;
        temp.persist(&self.destination).map_err(|e| output_err(e.error))?;

        Ok(target)
    }
}

impl Write for AtomicOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// The file a write to `target` lands in: the link target for a live symlink.
fn resolve_destination(target: &Path) -> PathBuf {
    let is_link = fs::symlink_metadata(target).is_ok_and(|m| m.file_type().is_symlink());
    if is_link && let Ok(resolved) = fs::canonicalize(target) {
        return resolved;
    }
    target.to_path_buf()
}

// Temp files are created owner-only; a bundle is an ordinary build artifact.
#[cfg(unix)]
fn default_permissions(_temp: &NamedTempFile) -> io::Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(temp: &NamedTempFile) -> io::Result<fs::Permissions> {
    Ok(temp.as_file().metadata()?.permissions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_directory_returns_every_entry() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::write(root.join("a.js"), "a")?;
        fs::write(root.join("b.txt"), "b")?;
        fs::create_dir(root.join("nested"))?;

        let mut names: Vec<String> = list_directory(root)?
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.js", "b.txt", "nested"]);
        Ok(())
    }

    #[test]
    fn test_list_missing_directory() {
        let err = list_directory(Path::new("definitely/not/here")).unwrap_err();
        assert!(matches!(err, BundleError::SourceDir { .. }));
    }

    #[test]
    fn test_commit_replaces_target() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let target = temp_dir.path().join("out.js");
        fs::write(&target, "stale")?;

        let mut output = AtomicOutput::create(&target)?;
        assert_eq!(output.target(), target.as_path());
        output.write_all(b"fresh\n")?;
        // Not visible until commit
        assert_eq!(fs::read_to_string(&target)?, "stale");

        output.commit()?;
        assert_eq!(fs::read_to_string(&target)?, "fresh\n");
        Ok(())
    }

    #[test]
    fn test_drop_without_commit_leaves_nothing() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let target = temp_dir.path().join("out.js");

        {
            let mut output = AtomicOutput::create(&target)?;
            output.write_all(b"partial")?;
        }

        assert!(!target.exists());
        assert_eq!(fs::read_dir(temp_dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_missing_output_dir() {
        let err = AtomicOutput::create(Path::new("no/such/dir/out.js")).unwrap_err();
        assert!(matches!(err, BundleError::Output { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_keeps_existing_permissions() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new()?;
        let target = temp_dir.path().join("out.js");
        fs::write(&target, "stale")?;
        fs::set_permissions(&target, fs::Permissions::from_mode(0o600))?;

        let mut output = AtomicOutput::create(&target)?;
        output.write_all(b"fresh\n")?;
        output.commit()?;

        assert_eq!(fs::metadata(&target)?.permissions().mode() & 0o777, 0o600);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_new_bundle_is_world_readable() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new()?;
        let target = temp_dir.path().join("out.js");

        let mut output = AtomicOutput::create(&target)?;
        output.write_all(b"fresh\n")?;
        output.commit()?;

        assert_eq!(fs::metadata(&target)?.permissions().mode() & 0o777, 0o644);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_target_written_through() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let real = temp_dir.path().join("real.js");
        let link = temp_dir.path().join("out.js");
        fs::write(&real, "stale")?;
        std::os::unix::fs::symlink(&real, &link)?;

        let mut output = AtomicOutput::create(&link)?;
        output.write_all(b"fresh\n")?;
        assert_eq!(output.commit()?, link);

        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real)?, "fresh\n");
        Ok(())
    }
}
