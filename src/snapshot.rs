use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::BrowseError;
use crate::fs_ops::{DirectoryEntry, Filesystem};
use crate::search;

/// The listing of one directory plus its search-filtered view.
///
/// Never patched in place after a filesystem change: every navigation or
/// deletion produces a fresh snapshot read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySnapshot {
    path: PathBuf,
    entries: Vec<DirectoryEntry>,
    filtered: Vec<usize>,
}

impl DirectorySnapshot {
    pub fn new(path: impl Into<PathBuf>, entries: Vec<DirectoryEntry>) -> Self {
        let filtered = (0..entries.len()).collect();
        Self {
            path: path.into(),
            entries,
            filtered,
        }
    }

    /// Placeholder used before the first listing arrives
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Vec::new())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn filtered(&self) -> impl Iterator<Item = &DirectoryEntry> + '_ {
        self.filtered.iter().map(|&i| &self.entries[i])
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Recompute the filtered view for `search`.
    pub fn apply_filter(&mut self, search: &str) {
        self.filtered = search::filter(&self.entries, search);
        debug!(
            "filter {:?} kept {} of {} entries",
            search,
            self.filtered.len(),
            self.entries.len()
        );
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Entry at `index` of the filtered view
    pub fn get(&self, index: usize) -> Option<&DirectoryEntry> {
        self.filtered.get(index).map(|&i| &self.entries[i])
    }

    /// Read `path` into a new snapshot; the caller's snapshot is untouched on failure.
    pub fn load(fs: &dyn Filesystem, path: &Path) -> Result<Self, BrowseError> {
        let entries = fs
            .list_directory(path)
            .map_err(|e| BrowseError::directory_read(path, e))?;
        info!("loaded {} ({} entries)", path.display(), entries.len());
        Ok(Self::new(path, entries))
    }

    pub fn descend(&self, fs: &dyn Filesystem, name: impl AsRef<Path>) -> Result<Self, BrowseError> {
        Self::load(fs, &self.path.join(name))
    }

    /// Parent directory listing, `None` when already at the root.
    pub fn ascend(&self, fs: &dyn Filesystem) -> Option<Result<Self, BrowseError>> {
        let parent = self.path.parent()?;
        Some(Self::load(fs, parent))
    }

    /// Delete the filtered entry at `index`, then re-read this directory.
    ///
    /// Returns `Ok(None)` when there is no entry at `index`.
    pub fn remove_entry(&self, fs: &dyn Filesystem, index: usize) -> Result<Option<Self>, BrowseError> {
        let Some(entry) = self.get(index) else {
            return Ok(None);
        };
        let target = self.path.join(&entry.file_name);
        fs.remove(&target).map_err(|e| BrowseError::delete(&target, e))?;
        info!("removed {}", target.display());
        Self::load(fs, &self.path).map(Some)
    }
}

/// Cursor and scroll position saved when descending into a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationFrame {
    pub cursor: usize,
    pub min_row: usize,
}

/// One frame per directory level descended during this run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackStack {
    frames: Vec<NavigationFrame>,
}

impl BackStack {
    pub fn push(&mut self, frame: NavigationFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<NavigationFrame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_ops::memory::MemoryFs;
    use crate::fs_ops::LocalFs;
    use std::fs;
    use tempfile::tempdir;

    fn sample_fs() -> MemoryFs {
        MemoryFs::new()
            .with_dir(
                "/home",
                vec![
                    DirectoryEntry::file("a.txt"),
                    DirectoryEntry::dir("docs"),
                    DirectoryEntry::file("abc.txt"),
                ],
            )
            .with_dir("/home/docs", vec![DirectoryEntry::file("notes.md")])
            .with_dir("/", vec![DirectoryEntry::dir("home")])
    }

    #[test]
    fn test_load_starts_unfiltered() {
        let fs = sample_fs();
        let snapshot = DirectorySnapshot::load(&fs, Path::new("/home")).unwrap();
        assert_eq!(snapshot.filtered_len(), 3);
        let filtered: Vec<_> = snapshot.filtered().collect();
        let all: Vec<_> = snapshot.entries().iter().collect();
        assert_eq!(filtered, all);
    }

    #[test]
    fn test_load_failure_reports_path() {
        let fs = sample_fs();
        let err = DirectorySnapshot::load(&fs, Path::new("/missing")).unwrap_err();
        assert!(matches!(
            err,
            BrowseError::DirectoryRead { ref path, .. } if path == Path::new("/missing")
        ));
    }

    #[test]
    fn test_filter_view_and_reset() {
        let fs = sample_fs();
        let mut snapshot = DirectorySnapshot::load(&fs, Path::new("/home")).unwrap();
        snapshot.apply_filter("a");
        let names: Vec<&str> = snapshot.filtered().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "abc.txt"]);
        assert_eq!(snapshot.get(1).unwrap().name, "abc.txt");
        assert!(snapshot.get(2).is_none());

        snapshot.apply_filter("");
        assert_eq!(snapshot.filtered_len(), 3);
    }

    #[test]
    fn test_descend_and_ascend_paths() {
        let fs = sample_fs();
        let home = DirectorySnapshot::load(&fs, Path::new("/home")).unwrap();
        let docs = home.descend(&fs, "docs").unwrap();
        assert_eq!(docs.path(), Path::new("/home/docs"));
        let back = docs.ascend(&fs).unwrap().unwrap();
        assert_eq!(back.path(), Path::new("/home"));
        let root = back.ascend(&fs).unwrap().unwrap();
        assert_eq!(root.path(), Path::new("/"));
        assert!(root.ascend(&fs).is_none());
    }

    #[test]
    fn test_remove_entry_rereads_directory() {
        let fs = sample_fs();
        let mut snapshot = DirectorySnapshot::load(&fs, Path::new("/home")).unwrap();
        snapshot.apply_filter("abc");
        let reloaded = snapshot.remove_entry(&fs, 0).unwrap().unwrap();
        let names: Vec<&str> = reloaded.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "docs"]);
        assert_eq!(reloaded.filtered_len(), 2);
    }

    #[test]
    fn test_remove_failure_keeps_snapshot() {
        let fs = sample_fs().with_locked("/home/a.txt");
        let snapshot = DirectorySnapshot::load(&fs, Path::new("/home")).unwrap();
        let err = snapshot.remove_entry(&fs, 0).unwrap_err();
        assert!(matches!(err, BrowseError::Delete { .. }));
        assert_eq!(snapshot.filtered_len(), 3);
        assert!(snapshot.remove_entry(&fs, 10).unwrap().is_none());
    }

    #[test]
    fn test_remove_on_disk() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("old.log"), "x").unwrap();
        fs::write(temp_dir.path().join("keep.txt"), "x").unwrap();

        let snapshot = DirectorySnapshot::load(&LocalFs, temp_dir.path()).unwrap();
        assert_eq!(snapshot.get(1).unwrap().name, "old.log");
        let reloaded = snapshot.remove_entry(&LocalFs, 1).unwrap().unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        assert!(!temp_dir.path().join("old.log").exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_remove_targets_raw_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = tempdir().unwrap();
        let raw = temp_dir.path().join(OsStr::from_bytes(b"a\xff"));
        let lookalike = temp_dir.path().join("a\u{FFFD}");
        fs::write(&raw, "raw").unwrap();
        fs::write(&lookalike, "utf8").unwrap();

        let snapshot = DirectorySnapshot::load(&LocalFs, temp_dir.path()).unwrap();
        let index = snapshot
            .filtered()
            .position(|e| e.file_name == OsStr::from_bytes(b"a\xff"))
            .unwrap();
        let reloaded = snapshot.remove_entry(&LocalFs, index).unwrap().unwrap();
        assert!(!raw.exists());
        assert!(lookalike.exists());
        assert_eq!(reloaded.filtered_len(), 1);

        let reloaded = reloaded.remove_entry(&LocalFs, 0).unwrap().unwrap();
        assert!(!lookalike.exists());
        assert_eq!(reloaded.filtered_len(), 0);
    }

    #[test]
    fn test_back_stack_lifo() {
        let mut stack = BackStack::default();
        stack.push(NavigationFrame { cursor: 3, min_row: 1 });
        stack.push(NavigationFrame { cursor: 7, min_row: 2 });
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), Some(NavigationFrame { cursor: 7, min_row: 2 }));
        assert_eq!(stack.pop(), Some(NavigationFrame { cursor: 3, min_row: 1 }));
        assert_eq!(stack.pop(), None);
    }
}
