//! In-memory mock filesystem for testing readers without a real `/proc`.
//!
//! The tree is a single ordered map from absolute path to node, so directory
//! listings come out sorted and tests are deterministic on any host.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::collector::traits::FileSystem;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    File(Vec<u8>),
    Dir,
}

/// In-memory read-only tree of files and directories.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    nodes: BTreeMap<PathBuf, Node>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file, creating missing parent directories.
    ///
    /// Content may be text or raw bytes.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        self.ensure_parents(path);
        self.nodes
            .insert(path.to_path_buf(), Node::File(content.into()));
    }

    /// Adds an empty directory, creating missing parents.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.ensure_parents(path);
        self.nodes.entry(path.to_path_buf()).or_insert(Node::Dir);
    }

    /// Removes a file or a directory together with everything under it.
    ///
    /// Used to simulate a process exiting between enumeration and sampling.
    pub fn remove(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.nodes.retain(|p, _| !p.starts_with(path));
    }

    /// Adds `/proc/<pid>/` with its `stat`, `status` and `cmdline` files.
    pub fn add_process(&mut self, pid: u32, stat: &str, status: &str, cmdline: &str) {
        let dir = Path::new("/proc").join(pid.to_string());
        for (name, content) in [("stat", stat), ("status", status), ("cmdline", cmdline)] {
            self.add_file(dir.join(name), content);
        }
    }

    /// Loads a captured directory tree from disk, mounted at `virtual_root`.
    pub fn from_snapshot(dir: &Path, virtual_root: &Path) -> io::Result<Self> {
        let mut fs = Self::new();
        fs.add_dir(virtual_root);

        let mut pending = vec![(dir.to_path_buf(), virtual_root.to_path_buf())];
        while let Some((real, virt)) = pending.pop() {
            for entry in std::fs::read_dir(&real)? {
                let entry = entry?;
                let target = virt.join(entry.file_name());
                let kind = entry.file_type()?;
                if kind.is_dir() {
                    fs.add_dir(&target);
                    pending.push((entry.path(), target));
                } else if kind.is_file() {
                    fs.add_file(&target, std::fs::read(entry.path())?);
                }
            }
        }
        Ok(fs)
    }

    fn ensure_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
    }
}

fn not_found(kind: &str, path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such {}: {}", kind, path.display()),
    )
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        String::from_utf8(self.read(path)?)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.nodes.get(path) {
            Some(Node::File(content)) => Ok(content.clone()),
            _ => Err(not_found("file", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.get(path), Some(Node::Dir))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.is_dir(path) {
            return Err(not_found("directory", path));
        }
        Ok(self
            .nodes
            .range(path.to_path_buf()..)
            .skip(1)
            .take_while(|(p, _)| p.starts_with(path))
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, _)| p.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file_creates_parents() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/uptime", "42.00 10.00\n");

        assert!(fs.is_dir(Path::new("/proc")));
        assert!(fs.exists(Path::new("/proc/uptime")));
        assert!(!fs.is_dir(Path::new("/proc/uptime")));
        assert_eq!(
            fs.read_to_string(Path::new("/proc/uptime")).unwrap(),
            "42.00 10.00\n"
        );
    }

    #[test]
    fn test_add_file_under_file_keeps_existing_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/uptime", "42.00 10.00\n");
        fs.add_file("/proc/uptime/extra", "x");

        assert!(!fs.is_dir(Path::new("/proc/uptime")));
        assert_eq!(
            fs.read_to_string(Path::new("/proc/uptime")).unwrap(),
            "42.00 10.00\n"
        );
        assert!(fs.is_dir(Path::new("/proc")));
    }

    #[test]
    fn test_invalid_utf8_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/5/cmdline", &b"caf\xe9\0"[..]);

        let path = Path::new("/proc/5/cmdline");
        assert_eq!(fs.read(path).unwrap(), b"caf\xe9\0");
        assert_eq!(
            fs.read_to_string(path).unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
    }

    #[test]
    fn test_read_dir_lists_direct_children_sorted() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/7/stat", "");
        fs.add_file("/proc/7/cmdline", "");
        fs.add_file("/proc/12/stat", "");
        fs.add_file("/proc/meminfo", "");
        fs.add_dir("/proc/self");

        let children = fs.read_dir(Path::new("/proc")).unwrap();
        assert_eq!(
            children,
            vec![
                PathBuf::from("/proc/12"),
                PathBuf::from("/proc/7"),
                PathBuf::from("/proc/meminfo"),
                PathBuf::from("/proc/self"),
            ]
        );

        let seven = fs.read_dir(Path::new("/proc/7")).unwrap();
        assert_eq!(seven.len(), 2);
    }

    #[test]
    fn test_read_dir_on_file_or_missing_path() {
        let mut fs = MockFs::new();
        fs.add_file("/etc/passwd", "");
        assert!(fs.read_dir(Path::new("/etc/passwd")).is_err());
        assert_eq!(
            fs.read_dir(Path::new("/sys")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_directory_is_not_readable_as_file() {
        let mut fs = MockFs::new();
        fs.add_dir("/proc/42");
        let err = fs.read_to_string(Path::new("/proc/42")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_add_process_layout() {
        let mut fs = MockFs::new();
        fs.add_process(321, "321 (sleep) S 1", "Name:\tsleep\n", "sleep\x0030\x00");

        assert!(fs.is_dir(Path::new("/proc/321")));
        for name in ["stat", "status", "cmdline"] {
            assert!(fs.exists(&Path::new("/proc/321").join(name)));
        }
        assert_eq!(
            fs.read_to_string(Path::new("/proc/321/cmdline")).unwrap(),
            "sleep\x0030\x00"
        );
    }

    #[test]
    fn test_remove_drops_subtree_only() {
        let mut fs = MockFs::new();
        fs.add_process(7, "7 (x) S", "Name:\tx\n", "x");
        fs.add_process(70, "70 (y) S", "Name:\ty\n", "y");

        fs.remove("/proc/7");

        assert!(!fs.exists(Path::new("/proc/7")));
        assert!(!fs.exists(Path::new("/proc/7/stat")));
        assert!(fs.exists(Path::new("/proc/70/stat")));
    }

    #[test]
    fn test_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("99")).unwrap();
        std::fs::write(dir.path().join("99").join("cmdline"), "sleep\x0060\x00").unwrap();
        std::fs::write(dir.path().join("uptime"), "10.00 5.00\n").unwrap();
        std::fs::write(dir.path().join("binary"), [0xffu8, 0xfe]).unwrap();

        let fs = MockFs::from_snapshot(dir.path(), Path::new("/proc")).unwrap();

        assert!(fs.is_dir(Path::new("/proc/99")));
        assert!(fs.exists(Path::new("/proc/99/cmdline")));
        assert_eq!(fs.read(Path::new("/proc/binary")).unwrap(), [0xffu8, 0xfe]);
        assert_eq!(
            fs.read_to_string(Path::new("/proc/uptime")).unwrap(),
            "10.00 5.00\n"
        );
    }
}
