//! Depth-first directory tree traversal
//!
//! [`TreeWalker`] visits every entry below a root directory, classifies it
//! once into an [`EntryKind`] and hands it to a [`TreeVisitor`]. The visitor's
//! `on_open`/`on_close` hooks bracket the traversal: once `on_open` succeeds,
//! `on_close` runs exactly once no matter how the walk ends.

use std::fmt::Display;
use std::fs::FileType;
use std::path::{Path, PathBuf};

/// Kind of a visited filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory
    Directory,
    /// Regular file
    RegularFile,
    /// Symbolic link (never followed)
    Symlink,
    /// Device node, socket or fifo
    Special,
}

impl EntryKind {
    /// Classify an entry from its (non-followed) file type
    pub fn classify(file_type: FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::RegularFile
        } else if file_type.is_symlink() {
            Self::Symlink
        } else {
            Self::Special
        }
    }
}

/// An entry handed to a [`TreeVisitor`]
#[derive(Debug)]
pub struct TreeEntry<'a> {
    /// Full path of the entry
    pub path: &'a Path,
    /// Path relative to the walk root
    pub relative: &'a Path,
    /// Entry classification
    pub kind: EntryKind,
}

/// Per-entry callbacks for [`TreeWalker`]
pub trait TreeVisitor {
    /// Error that aborts the walk
    type Error: From<walkdir::Error> + Display;

    /// Acquire resources before the walk; failure skips the walk entirely
    fn on_open(&mut self) -> Result<(), Self::Error>;

    /// Release resources; called once after `on_open` succeeded
    fn on_close(&mut self, walk_succeeded: bool) -> Result<(), Self::Error>;

    /// A directory below the root is about to be descended into
    fn on_directory_enter(&mut self, _entry: &TreeEntry<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// A regular file
    fn on_regular_file(&mut self, entry: &TreeEntry<'_>) -> Result<(), Self::Error>;

    /// A symbolic link
    fn on_symlink(&mut self, _entry: &TreeEntry<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// A device node, socket or fifo
    fn on_special(&mut self, _entry: &TreeEntry<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Lifecycle of a [`TreeWalker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkPhase {
    /// Not started
    Idle,
    /// `on_open` succeeded
    Opened,
    /// Entries are being visited
    Walking,
    /// Finished, successfully or not
    Closed,
}

/// Depth-first walker over a directory tree
#[derive(Debug)]
pub struct TreeWalker {
    root: PathBuf,
    phase: WalkPhase,
}

impl TreeWalker {
    /// Create a walker rooted at `root`
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            phase: WalkPhase::Idle,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> WalkPhase {
        self.phase
    }

    /// Walk the tree, driving `visitor`
    ///
    /// Entries are visited in file-name order within each directory. The
    /// first visitor error aborts the walk; `on_close` still runs and the
    /// walk error is returned in preference to a close error.
    pub fn run<V: TreeVisitor>(&mut self, visitor: &mut V) -> Result<(), V::Error> {
        if let Err(e) = visitor.on_open() {
            self.phase = WalkPhase::Closed;
            return Err(e);
        }
        self.phase = WalkPhase::Opened;
        tracing::debug!("Walking {}", self.root.display());

        let walked = self.visit_all(visitor);

        let closed = visitor.on_close(walked.is_ok());
        self.phase = WalkPhase::Closed;

        match (walked, closed) {
            (Err(e), Err(close_err)) => {
                tracing::warn!("Failed to close after aborted walk: {}", close_err);
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), closed) => closed,
        }
    }

    fn visit_all<V: TreeVisitor>(&mut self, visitor: &mut V) -> Result<(), V::Error> {
        self.phase = WalkPhase::Walking;
        let walker = walkdir::WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }

            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            let tree_entry = TreeEntry {
                path: entry.path(),
                relative,
                kind: EntryKind::classify(entry.file_type()),
            };

            match tree_entry.kind {
                EntryKind::Directory => visitor.on_directory_enter(&tree_entry)?,
                EntryKind::RegularFile => visitor.on_regular_file(&tree_entry)?,
                EntryKind::Symlink => visitor.on_symlink(&tree_entry)?,
                EntryKind::Special => visitor.on_special(&tree_entry)?,
            }
        }

        Ok(())
    }
}
