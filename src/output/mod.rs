//! Output file writers.

mod ellipsoid;
mod html;
mod invue;
mod kinemage;
pub mod progress;

pub use ellipsoid::{Triangle, ellipsoid, unit_sphere};
pub use html::kinemage_page;
pub use invue::{
    InvueOptions, interpolate, sphere_points, write_all_samples, write_group_files,
    write_polyhedron,
};
pub use kinemage::{KinemageOptions, Overlays, auto_radius, scale_coords, write_mage_output};

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Create (or truncate) an output file for buffered writing.
pub fn create_output_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| Error::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Create `path`, run `write` against it and flush.
///
/// Any I/O failure, including during the writes, is reported as
/// [`Error::OutputWrite`] for `path`.
pub fn write_output_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let mut writer = create_output_file(path)?;
    write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| Error::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Create a directory and its parents if missing.
pub fn create_output_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::OutputDirCreateFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_output_dir_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        create_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // existing directories are fine
        create_output_dir(&nested).unwrap();
    }

    #[test]
    fn test_write_output_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        write_output_file(&path, |w| writeln!(w, "a\tb")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\tb\n");
    }

    #[test]
    fn test_write_output_file_error_keeps_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let err = write_output_file(&path, |_| {
            Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "disk full"))
        })
        .unwrap_err();
        assert!(matches!(
            &err,
            Error::OutputWrite { path: failed, source }
                if *failed == path && source.kind() == std::io::ErrorKind::WriteZero
        ));
        assert!(err.to_string().contains("out.txt"));
    }

    #[test]
    fn test_create_output_file_missing_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(matches!(
            create_output_file(&path),
            Err(Error::OutputWrite { .. })
        ));
    }
}
