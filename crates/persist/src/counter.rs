//! Version counter storage.
//!
//! File format: the decimal version followed by a single `\n`.

use std::io;
use std::path::{Path, PathBuf};

use versnap_common::{ParseVersionError, Version};

/// Errors from reading or writing a version counter.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("cannot access version counter {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseVersionError),
}

/// Backing store for the snapshot version counter.
pub trait CounterStore {
    /// Current counter value.
    fn read(&self) -> Result<Version, CounterError>;

    /// Replace the stored value.
    fn write(&mut self, version: Version) -> Result<(), CounterError>;
}

/// Counter persisted as decimal text in a file.
#[derive(Debug, Clone)]
pub struct FileCounter {
    path: PathBuf,
}

impl FileCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> CounterError {
        CounterError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CounterStore for FileCounter {
    fn read(&self) -> Result<Version, CounterError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Ok(text.parse()?)
    }

    /// Overwrites the file. The parent directory is never created here.
    fn write(&mut self, version: Version) -> Result<(), CounterError> {
        std::fs::write(&self.path, format!("{version}\n")).map_err(|e| self.io_error(e))
    }
}

/// In-memory counter for exercising the snapshot flow without a counter file.
#[derive(Debug, Clone, Default)]
pub struct MemoryCounter {
    value: Option<Version>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryCounter {
    /// A counter with nothing stored yet; reads fail like a missing file.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(version: Version) -> Self {
        Self {
            value: Some(version),
            ..Self::default()
        }
    }

    /// Make every read fail, even when a value is stored.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Make every write fail.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// The stored value, bypassing the failure switches.
    pub fn value(&self) -> Option<Version> {
        self.value
    }

    fn io_error(kind: io::ErrorKind) -> CounterError {
        CounterError::Io {
            path: PathBuf::from("<memory>"),
            source: io::Error::from(kind),
        }
    }
}

impl CounterStore for MemoryCounter {
    fn read(&self) -> Result<Version, CounterError> {
        if self.fail_reads {
            return Err(Self::io_error(io::ErrorKind::Other));
        }
        self.value.ok_or_else(|| Self::io_error(io::ErrorKind::NotFound))
    }

    fn write(&mut self, version: Version) -> Result<(), CounterError> {
        if self.fail_writes {
            return Err(Self::io_error(io::ErrorKind::PermissionDenied));
        }
        self.value = Some(version);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_counter_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let counter = FileCounter::new(tmp.path().join("version.txt"));
        match counter.read() {
            Err(CounterError::Io { path, source }) => {
                assert_eq!(path, tmp.path().join("version.txt"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn file_counter_write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("version.txt");
        let mut counter = FileCounter::new(&path);

        counter.write(Version::new(6)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "6\n");
        assert_eq!(counter.read().unwrap(), Version::new(6));
    }

    #[test]
    fn file_counter_write_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("version.txt");
        std::fs::write(&path, "123456789 and some trailing junk\n").unwrap();

        let mut counter = FileCounter::new(&path);
        counter.write(Version::new(2)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2\n");
    }

    #[test]
    fn file_counter_rejects_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("version.txt");
        std::fs::write(&path, "abc").unwrap();

        let counter = FileCounter::new(&path);
        assert!(matches!(counter.read(), Err(CounterError::Parse(_))));
    }

    #[test]
    fn file_counter_rejects_non_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("version.txt");
        std::fs::write(&path, [0xff, 0xfe, b'1']).unwrap();

        let counter = FileCounter::new(&path);
        assert!(matches!(counter.read(), Err(CounterError::Io { .. })));
    }

    #[test]
    fn file_counter_does_not_create_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let mut counter = FileCounter::new(tmp.path().join("missing").join("version.txt"));
        assert!(counter.write(Version::new(1)).is_err());
        assert!(!tmp.path().join("missing").exists());
    }

    #[test]
    fn memory_counter_behaves_like_missing_file() {
        let mut counter = MemoryCounter::new();
        assert!(counter.read().is_err());

        counter.write(Version::new(4)).unwrap();
        assert_eq!(counter.read().unwrap(), Version::new(4));
    }

    #[test]
    fn memory_counter_failure_switches() {
        let counter = MemoryCounter::with_value(Version::new(9)).failing_reads();
        assert!(counter.read().is_err());
        assert_eq!(counter.value(), Some(Version::new(9)));

        let mut counter = MemoryCounter::new().failing_writes();
        assert!(counter.write(Version::new(1)).is_err());
        assert_eq!(counter.value(), None);
    }
}
