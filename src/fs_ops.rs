use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use log::warn;

/// Shown in place of the permission string when metadata cannot be read
pub const MODE_PLACEHOLDER: &str = "error reading permission bits";

/// One listed item of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Name as stored on disk; every filesystem operation goes through this
    pub file_name: OsString,
    /// Lossy UTF-8 form for display and search
    pub name: String,
    pub is_dir: bool,
    /// Symlink whose target resolved to a directory when the listing was read
    pub is_symlink_dir: bool,
    /// `ls`-style permission string, `None` if metadata was unreadable
    pub mode: Option<String>,
}

impl DirectoryEntry {
    /// Whether entering this entry should descend into it
    pub fn is_navigable(&self) -> bool {
        self.is_dir || self.is_symlink_dir
    }
}

#[cfg(test)]
impl DirectoryEntry {
    pub fn file(name: &str) -> Self {
        Self {
            file_name: OsString::from(name),
            name: name.to_string(),
            is_dir: false,
            is_symlink_dir: false,
            mode: Some("-rw-r--r--".to_string()),
        }
    }

    pub fn dir(name: &str) -> Self {
        Self {
            file_name: OsString::from(name),
            name: name.to_string(),
            is_dir: true,
            is_symlink_dir: false,
            mode: Some("drwxr-xr-x".to_string()),
        }
    }
}

/// Storage the browser reads listings from and deletes entries in.
pub trait Filesystem {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirectoryEntry>>;
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// The real local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirectoryEntry>> {
        let mut entries: Vec<DirectoryEntry> = fs::read_dir(path)?
            .filter_map(|item| read_entry(path, item))
            .collect();
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if fs::symlink_metadata(path)?.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }
}

/// Convert one `read_dir` item, skipping (and logging) entries that cannot be inspected.
fn read_entry(dir: &Path, item: io::Result<fs::DirEntry>) -> Option<DirectoryEntry> {
    let item = match item {
        Ok(item) => item,
        Err(e) => {
            warn!("skipping unreadable entry in {}: {e}", dir.display());
            return None;
        }
    };
    let file_type = match item.file_type() {
        Ok(file_type) => file_type,
        Err(e) => {
            warn!("skipping {}: {e}", item.path().display());
            return None;
        }
    };
    let file_name = item.file_name();
    Some(DirectoryEntry {
        name: file_name.to_string_lossy().into_owned(),
        file_name,
        is_dir: file_type.is_dir(),
        is_symlink_dir: file_type.is_symlink() && resolves_to_directory(&item.path()),
        // DirEntry::metadata does not traverse symlinks
        mode: item.metadata().ok().map(|md| permission_string(&md)),
    })
}

/// Best effort: any failure to follow the link counts as "not a directory".
pub fn resolves_to_directory(path: &Path) -> bool {
    fs::metadata(path).map(|md| md.is_dir()).unwrap_or(false)
}

fn kind_char(md: &fs::Metadata) -> char {
    let file_type = md.file_type();
    if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'l'
    } else {
        '-'
    }
}

#[cfg(unix)]
pub fn permission_string(md: &fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = md.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(kind_char(md));
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
pub fn permission_string(md: &fs::Metadata) -> String {
    let rest = if md.permissions().readonly() {
        "r--r--r--"
    } else {
        "rw-rw-rw-"
    };
    format!("{}{}", kind_char(md), rest)
}

#[cfg(test)]
pub mod memory {
    use std::cell::RefCell;
    use std::collections::{BTreeMap, BTreeSet};
    use std::io;
    use std::path::{Path, PathBuf};

    use super::{DirectoryEntry, Filesystem};

    /// In-memory directory tree for driving the browser in tests.
    #[derive(Debug, Default)]
    pub struct MemoryFs {
        dirs: RefCell<BTreeMap<PathBuf, Vec<DirectoryEntry>>>,
        locked: BTreeSet<PathBuf>,
    }

    impl MemoryFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dir(self, path: &str, entries: Vec<DirectoryEntry>) -> Self {
            self.dirs.borrow_mut().insert(PathBuf::from(path), entries);
            self
        }

        /// Reads of and removals at `path` fail with permission denied
        pub fn with_locked(mut self, path: &str) -> Self {
            self.locked.insert(PathBuf::from(path));
            self
        }

        fn denied() -> io::Error {
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied")
        }
    }

    impl Filesystem for MemoryFs {
        fn list_directory(&self, path: &Path) -> io::Result<Vec<DirectoryEntry>> {
            if self.locked.contains(path) {
                return Err(Self::denied());
            }
            self.dirs
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such directory"))
        }

        fn remove(&self, path: &Path) -> io::Result<()> {
            if self.locked.contains(path) {
                return Err(Self::denied());
            }
            let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
                return Err(io::Error::new(io::ErrorKind::InvalidInput, "bad path"));
            };
            let mut dirs = self.dirs.borrow_mut();
            let entries = dirs
                .get_mut(parent)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such directory"))?;
            let before = entries.len();
            entries.retain(|e| e.file_name != name);
            if entries.len() == before {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
            }
            Ok(())
        }
    }
}
