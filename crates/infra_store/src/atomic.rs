//! Whole-file replacement through a temp file in the destination directory.

use std::fs::{self, File};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;

/// Write `path` by filling a sibling temp file and renaming it into place.
///
/// Readers see either the previous file or the complete new one. On error the
/// temp file is removed and `path` is left untouched.
pub(crate) fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    fill(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), "Replaced table file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::io::Write;

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("table.bin");

        write_atomic(&path, |f| Ok(f.write_all(b"first")?)).unwrap();
        write_atomic(&path, |f| Ok(f.write_all(b"second")?)).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.bin");
        fs::write(&path, b"original").unwrap();

        let result = write_atomic(&path, |f| {
            f.write_all(b"partial")?;
            Err(StoreError::schema("table.bin", "boom"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), b"original");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
