//! Test helpers for writing map and package files into a temporary directory.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Write `contents` to `path`, failing the test on error.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).expect("write fixture file");
}

/// Temporary directory holding the input files for one test.
#[derive(Debug)]
pub(super) struct InputFiles {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl InputFiles {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn map(&self) -> Utf8PathBuf {
        self.root.join("map.txt")
    }

    pub(super) fn packages(&self) -> Utf8PathBuf {
        self.root.join("packages.txt")
    }

    pub(super) fn write_map(&self, contents: &str) -> Utf8PathBuf {
        let path = self.map();
        write_utf8(&path, contents.as_bytes());
        path
    }

    pub(super) fn write_packages(&self, contents: &str) -> Utf8PathBuf {
        let path = self.packages();
        write_utf8(&path, contents.as_bytes());
        path
    }
}
