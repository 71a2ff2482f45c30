//! Filesystem seam between the readers and the kernel interfaces.
//!
//! Production code reads through [`RealFs`]; tests substitute an in-memory
//! tree (see [`crate::collector::mock::MockFs`]).

use std::io;
use std::path::{Path, PathBuf};

/// Read-only view of a filesystem.
///
/// Only what the readers need: whole-file reads and enough metadata to
/// enumerate process directories.
pub trait FileSystem: Send + Sync {
    /// Returns the whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Returns the whole file as raw bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn exists(&self, path: &Path) -> bool;

    /// True only for an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Full paths of the direct children of `path`, in no particular order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }
}
