//! File gateway - the only component that touches source files
//!
//! Provides:
//! - File → Document loading (ingress)
//! - Document → File atomic writes (egress)
//! - One read → patch → write session per file

use crate::error::{IoError, SessionError};
use guardpatch_core::{ContentHash, Document, PatchReport, Patcher};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A loaded source file
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File path
    pub path: PathBuf,
    /// Lines as read
    pub document: Document,
    /// Checksum of the file content
    pub checksum: ContentHash,
}

/// Options for [`FileGateway::patch_file`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOptions {
    /// Compute outcomes but never write
    pub dry_run: bool,
}

/// Summary of one patched file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// File path
    pub path: PathBuf,
    /// Checksum before patching
    pub before: ContentHash,
    /// Checksum of the patched content
    pub after: ContentHash,
    /// Whether the file was rewritten
    pub written: bool,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Per-target outcomes
    pub report: PatchReport,
}

impl FileReport {
    /// Number of targets applied (or that would be, on a dry run)
    #[inline]
    #[must_use]
    pub fn applied(&self) -> usize {
        self.report.applied()
    }

    /// Whether the content changed
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Reads and writes source files on behalf of the patcher
#[derive(Debug, Clone)]
pub struct FileGateway {
    max_file_size: u64,
}

impl Default for FileGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl FileGateway {
    /// Gateway with the default 64 MiB limit
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_file_size(64 * 1024 * 1024)
    }

    /// Gateway with a specific size limit (bytes)
    #[inline]
    #[must_use]
    pub fn with_max_file_size(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Read a UTF-8 file into a document
    ///
    /// # Errors
    /// - `IoError::Read` if the file is missing, unreadable or not UTF-8
    /// - `IoError::TooLarge` if it exceeds the size limit
    pub fn read(&self, path: impl AsRef<Path>) -> Result<SourceFile, IoError> {
        let path = path.as_ref();

        let size = std::fs::metadata(path)
            .map_err(|e| IoError::read(path, e))?
            .len();
        if size > self.max_file_size {
            return Err(IoError::TooLarge {
                path: path.to_path_buf(),
                size,
                max: self.max_file_size,
            });
        }

        let text = std::fs::read_to_string(path).map_err(|e| IoError::read(path, e))?;
        let document = Document::from_text(&text);
        let checksum = ContentHash::of_text(&text);
        tracing::debug!(path = %path.display(), lines = document.len(), checksum = %checksum.short(), "read source");

        Ok(SourceFile {
            path: path.to_path_buf(),
            document,
            checksum,
        })
    }

    /// Overwrite `path` with the document's text
    ///
    /// Writes to a temporary file in the same directory and renames it over
    /// the target, keeping the original file's permissions.
    ///
    /// # Errors
    /// Returns `IoError::Write` if any step fails
    pub fn write(&self, path: impl AsRef<Path>, document: &Document) -> Result<(), IoError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| IoError::write(path, e))?;
        tmp.write_all(document.to_text().as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| IoError::write(path, e))?;

        if let Ok(metadata) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| IoError::write(path, e))?;
        }

        tmp.persist(path).map_err(|e| IoError::write(path, e.error))?;
        tracing::debug!(path = %path.display(), lines = document.len(), "wrote source");
        Ok(())
    }

    /// Read, patch and (unless dry run or unchanged) write back one file
    ///
    /// # Errors
    /// - `SessionError::Io` if reading or writing fails
    /// - `SessionError::Patch` if the patcher's policy rejects the run
    pub fn patch_file(
        &self,
        path: impl AsRef<Path>,
        patcher: &Patcher,
        options: PatchOptions,
    ) -> Result<FileReport, SessionError> {
        let SourceFile {
            path,
            mut document,
            checksum: before,
        } = self.read(path)?;

        let report = patcher.apply(&mut document)?;
        let after = document.checksum();
        let written = !options.dry_run && after != before;
        if written {
            self.write(&path, &document)?;
        }

        tracing::info!(
            path = %path.display(),
            applied = report.applied(),
            total = report.len(),
            written,
            dry_run = options.dry_run,
            "patched file"
        );

        Ok(FileReport {
            path,
            before,
            after,
            written,
            dry_run: options.dry_run,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn read_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileGateway::new().read(dir.path().join("absent.go")).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }

    #[test]
    fn read_rejects_oversized_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, "0123456789").unwrap();

        let err = FileGateway::with_max_file_size(4).read(&path).unwrap_err();
        assert!(matches!(err, IoError::TooLarge { size: 10, max: 4, .. }));
    }

    #[test]
    fn read_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        std::fs::write(&path, [0xff, 0xfe, b'\n']).unwrap();
        assert!(matches!(FileGateway::new().read(&path), Err(IoError::Read { .. })));
    }

    #[test]
    fn write_then_read_preserves_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.go");
        let text = "package main\r\n\n\tx := 1";
        let gateway = FileGateway::new();

        gateway.write(&path, &Document::from_text(text)).unwrap();
        let source = gateway.read(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
        assert_eq!(source.checksum, ContentHash::of_text(text));
        assert_eq!(source.document.len(), 3);
    }
}
