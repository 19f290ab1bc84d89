//! Content reader capability.
//!
//! The engine never touches the file system directly. Every header is read
//! through a [`ContentReader`], so the extractor and assembler can run against
//! an in-memory tree in tests.

use std::collections::HashMap;
use std::io;

/// Narrow capability: resolve a normalized path to its textual content.
pub trait ContentReader {
    /// Read the full content of `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the path is absent or unreadable.
    fn read(&self, path: &str) -> io::Result<String>;
}

impl<R: ContentReader + ?Sized> ContentReader for &R {
    fn read(&self, path: &str) -> io::Result<String> {
        (**self).read(path)
    }
}

/// Reads headers from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl ContentReader for FsReader {
    fn read(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory reader keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: HashMap<String, String>,
}

impl MemoryReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ContentReader for MemoryReader {
    fn read(&self, path: &str) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such header: {path}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn memory_reader_returns_inserted_content() {
        let reader = MemoryReader::new().with("include/a.h", "int a;");
        assert_eq!(reader.read("include/a.h").expect("present"), "int a;");
        assert_eq!(reader.len(), 1);
    }

    #[test]
    fn memory_reader_missing_path_is_not_found() {
        let reader = MemoryReader::new();
        let err = reader.read("include/missing.h").expect_err("absent");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("include/missing.h"));
    }

    #[test]
    fn fs_reader_reads_real_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("x.h");
        fs::write(&path, "struct X {};\n").expect("write header");

        let content = FsReader
            .read(path.to_str().expect("utf-8 path"))
            .expect("read header");
        assert_eq!(content, "struct X {};\n");
    }

    #[test]
    fn fs_reader_missing_file_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope.h");
        assert!(FsReader.read(path.to_str().expect("utf-8 path")).is_err());
    }

    fn read_through<R: ContentReader>(reader: R, path: &str) -> io::Result<String> {
        reader.read(path)
    }

    #[test]
    fn reader_by_reference_delegates() {
        let reader = MemoryReader::new().with("a.h", "x");
        assert_eq!(read_through(&reader, "a.h").expect("present"), "x");
        let dynamic: &dyn ContentReader = &reader;
        assert_eq!(read_through(dynamic, "a.h").expect("present"), "x");
    }
}
