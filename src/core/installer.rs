//! AROMA installer archive generation
//!
//! Walks a template tree and writes every regular file into a DEFLATE zip,
//! keeping the low permission bits. The AROMA config template
//! (`META-INF/com/google/android/aroma-config.in`) is rendered through
//! [`template::render`] and stored without its `.in` suffix. Symlinks,
//! special files and files whose path is not valid UTF-8 are skipped with a
//! warning.

use std::fs::File;
use std::io::{Read, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::template::{self, TemplateContext};
use crate::config::defaults::{
    AROMA_CONFIG_TEMPLATE, COPY_BUFFER_SIZE, TEMPLATE_SUFFIX, ZIP64_THRESHOLD,
};
use crate::error::ArchiveError;
use crate::infra::walk::{EntryKind, TreeEntry, TreeVisitor, TreeWalker};

/// What happens to a visited entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPlan {
    /// No entry of its own; implied by the files below it
    Directory,
    /// Copied verbatim with its permission bits
    RegularFile,
    /// Rendered in memory and stored without the template suffix
    TemplatedFile,
    /// Skipped with a warning
    SymlinkSkip,
    /// Skipped with a warning
    SpecialSkip,
    /// Regular file whose relative path is not valid UTF-8; skipped with a
    /// warning
    NameSkip,
}

impl EntryPlan {
    pub fn for_entry(relative: &Path, kind: EntryKind) -> Self {
        match kind {
            EntryKind::Directory => Self::Directory,
            EntryKind::RegularFile if relative == Path::new(AROMA_CONFIG_TEMPLATE) => {
                Self::TemplatedFile
            }
            EntryKind::RegularFile => Self::RegularFile,
            EntryKind::Symlink => Self::SymlinkSkip,
            EntryKind::Special => Self::SpecialSkip,
        }
    }
}

/// An entry left out of the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Summary of a finished archive
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    /// Archive entry names, in write order
    pub entries: Vec<String>,
    /// Entries that were not archived
    pub skipped: Vec<SkippedEntry>,
}

impl From<walkdir::Error> for ArchiveError {
    fn from(e: walkdir::Error) -> Self {
        ArchiveError::Read {
            path: e.path().map(Path::to_path_buf).unwrap_or_default(),
            error: e.to_string(),
        }
    }
}

/// Build the installer archive at `dest` from the tree at `source_dir`
///
/// Entries are written in walk order, relative to `source_dir`. On a failed
/// walk the archive written so far is still finalized at `dest`.
///
/// # Arguments
///
/// * `source_dir` - Root of the template tree
/// * `dest` - Path of the zip to create, overwritten if present
/// * `context` - Values substituted into the AROMA config template
///
/// # Returns
///
/// * `Ok(GenerateReport)` - Names written and entries skipped
/// * `Err(ArchiveError)` - If `source_dir` is not a directory, or reading a
///   source file or writing the archive fails
pub fn generate(
    source_dir: &Path,
    dest: &Path,
    context: &TemplateContext,
) -> Result<GenerateReport, ArchiveError> {
    if !source_dir.is_dir() {
        return Err(ArchiveError::SourceNotFound {
            path: source_dir.to_path_buf(),
        });
    }

    tracing::info!(
        "Generating {} from {}",
        dest.display(),
        source_dir.display()
    );

    let mut generator = AromaGenerator::new(dest, context);
    TreeWalker::new(source_dir).run(&mut generator)?;

    tracing::info!(
        "Wrote {} entries to {} ({} skipped)",
        generator.report.entries.len(),
        dest.display(),
        generator.report.skipped.len()
    );
    Ok(generator.report)
}

struct AromaGenerator<'a> {
    dest: &'a Path,
    context: &'a TemplateContext,
    writer: Option<ZipWriter<File>>,
    report: GenerateReport,
}

impl<'a> AromaGenerator<'a> {
    fn new(dest: &'a Path, context: &'a TemplateContext) -> Self {
        Self {
            dest,
            context,
            writer: None,
            report: GenerateReport::default(),
        }
    }

    fn start_entry(&mut self, name: &str, size: u64, mode: u32) -> Result<(), ArchiveError> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(mode & 0o777)
            .large_file(size >= ZIP64_THRESHOLD);

        let writer = self.writer.as_mut().ok_or_else(|| ArchiveError::Write {
            name: name.to_string(),
            error: "archive is not open".to_string(),
        })?;
        writer
            .start_file(name, options)
            .map_err(|e| ArchiveError::Write {
                name: name.to_string(),
                error: e.to_string(),
            })?;

        self.report.entries.push(name.to_string());
        Ok(())
    }

    fn write_chunk(&mut self, name: &str, data: &[u8]) -> Result<(), ArchiveError> {
        let writer = self.writer.as_mut().ok_or_else(|| ArchiveError::Write {
            name: name.to_string(),
            error: "archive is not open".to_string(),
        })?;
        writer.write_all(data).map_err(|e| ArchiveError::Write {
            name: name.to_string(),
            error: e.to_string(),
        })
    }

    fn add_templated(&mut self, entry: &TreeEntry<'_>, name: &str) -> Result<(), ArchiveError> {
        let read_error = |e: std::io::Error| ArchiveError::Read {
            path: entry.path.to_path_buf(),
            error: e.to_string(),
        };
        let mode = std::fs::metadata(entry.path).map_err(read_error)?.permissions().mode();
        let data = std::fs::read(entry.path).map_err(read_error)?;

        let rendered = template::render(&data, self.context);
        let name = name.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(name);

        // Stored with the template file's own mode, like every other entry
        self.start_entry(name, rendered.len() as u64, mode)?;
        self.write_chunk(name, &rendered)
    }

    fn add_file(&mut self, entry: &TreeEntry<'_>, name: &str) -> Result<(), ArchiveError> {
        let read_error = |e: std::io::Error| ArchiveError::Read {
            path: entry.path.to_path_buf(),
            error: e.to_string(),
        };
        let mut file = File::open(entry.path).map_err(read_error)?;
        let metadata = file.metadata().map_err(read_error)?;

        self.start_entry(name, metadata.len(), metadata.permissions().mode())?;

        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        loop {
            let n = match file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(read_error(e)),
            };
            self.write_chunk(name, &buf[..n])?;
        }

        Ok(())
    }

    fn visit(&mut self, entry: &TreeEntry<'_>) -> Result<(), ArchiveError> {
        let plan = EntryPlan::for_entry(entry.relative, entry.kind);
        match plan {
            EntryPlan::Directory => return Ok(()),
            EntryPlan::SymlinkSkip | EntryPlan::SpecialSkip | EntryPlan::NameSkip => {
                self.skip(entry, plan);
                return Ok(());
            }
            EntryPlan::RegularFile | EntryPlan::TemplatedFile => {}
        }

        let Some(name) = entry.relative.to_str() else {
            self.skip(entry, EntryPlan::NameSkip);
            return Ok(());
        };
        tracing::debug!("{} -> {}", entry.path.display(), name);

        if plan == EntryPlan::TemplatedFile {
            self.add_templated(entry, name)
        } else {
            self.add_file(entry, name)
        }
    }

    fn skip(&mut self, entry: &TreeEntry<'_>, plan: EntryPlan) {
        let what = match plan {
            EntryPlan::SymlinkSkip => "symlink",
            EntryPlan::NameSkip => "file with non-UTF-8 name",
            _ => "special file",
        };
        tracing::warn!(
            "Ignoring {} when creating zip: {}",
            what,
            entry.path.display()
        );
        self.report.skipped.push(SkippedEntry {
            path: entry.relative.to_path_buf(),
            kind: entry.kind,
        });
    }
}

impl TreeVisitor for AromaGenerator<'_> {
    type Error = ArchiveError;

    fn on_open(&mut self) -> Result<(), ArchiveError> {
        let file = File::create(self.dest).map_err(|e| ArchiveError::Open {
            path: self.dest.to_path_buf(),
            error: e.to_string(),
        })?;
        self.writer = Some(ZipWriter::new(file));
        Ok(())
    }

    fn on_close(&mut self, walk_succeeded: bool) -> Result<(), ArchiveError> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        if !walk_succeeded {
            tracing::debug!("Closing incomplete archive {}", self.dest.display());
        }

        writer.finish().map_err(|e| ArchiveError::Close {
            path: self.dest.to_path_buf(),
            error: e.to_string(),
        })?;
        Ok(())
    }

    fn on_directory_enter(&mut self, entry: &TreeEntry<'_>) -> Result<(), ArchiveError> {
        self.visit(entry)
    }

    fn on_regular_file(&mut self, entry: &TreeEntry<'_>) -> Result<(), ArchiveError> {
        self.visit(entry)
    }

    fn on_symlink(&mut self, entry: &TreeEntry<'_>) -> Result<(), ArchiveError> {
        self.visit(entry)
    }

    fn on_special(&mut self, entry: &TreeEntry<'_>) -> Result<(), ArchiveError> {
        self.visit(entry)
    }
}
