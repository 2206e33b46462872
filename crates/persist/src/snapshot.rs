use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};
use versnap_common::{SnapshotLayout, Version};

use crate::archive::archive_directory;
use crate::counter::{CounterError, CounterStore, FileCounter};

/// Errors from a snapshot run. All of them are fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("source directory {} does not exist", .0.display())]
    SourceMissing(PathBuf),
    #[error("file name {} is not valid UTF-8", .0.display())]
    NonUtf8Name(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("version counter error: {0}")]
    Counter(#[from] CounterError),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Outcome of one successful snapshot run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotReceipt {
    /// Version consumed by this run; the counter now holds its successor.
    pub version: Version,
    pub archive_path: PathBuf,
    /// Files and directories stored in the archive.
    pub entries: usize,
    /// Lowercase hex SHA-256 of the archive file.
    pub sha256: String,
}

/// Archives the source tree under the current version and advances the counter.
///
/// Concurrent runs against the same layout race: both may read the same
/// version and the last counter write wins. No locking is attempted.
#[derive(Debug)]
pub struct Snapshotter<C> {
    layout: SnapshotLayout,
    counter: C,
}

impl Snapshotter<FileCounter> {
    /// Snapshotter using the layout's counter file.
    pub fn from_layout(layout: SnapshotLayout) -> Self {
        let counter = FileCounter::new(layout.counter_file.clone());
        Self::new(layout, counter)
    }
}

impl<C: CounterStore> Snapshotter<C> {
    pub fn new(layout: SnapshotLayout, counter: C) -> Self {
        Self { layout, counter }
    }

    pub fn layout(&self) -> &SnapshotLayout {
        &self.layout
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// Version the next run will archive under.
    ///
    /// Any failure to read the counter, whatever its cause, yields zero.
    pub fn current_version(&self) -> Version {
        match self.counter.read() {
            Ok(version) => version,
            Err(e) => {
                debug!(error = %e, "version counter unavailable, starting from zero");
                Version::ZERO
            }
        }
    }

    /// Archive the source tree, report the saved version on `out`, then
    /// persist the next version.
    ///
    /// The report is written before the counter, so it is visible even when
    /// the counter write fails.
    pub fn run(&mut self, out: &mut impl Write) -> SnapshotResult<SnapshotReceipt> {
        let version = self.current_version();
        let archive_path = self.layout.archive_path(version);

        let summary = archive_directory(&self.layout.source_dir, &archive_path)?;
        info!(
            %version,
            path = %archive_path.display(),
            files = summary.files,
            directories = summary.directories,
            "archive written"
        );
        debug!(%version, sha256 = %summary.sha256, "archive digest");

        writeln!(out, "saved version {version}")?;
        out.flush()?;

        self.counter.write(version.next())?;

        Ok(SnapshotReceipt {
            version,
            archive_path,
            entries: summary.entries(),
            sha256: summary.sha256,
        })
    }
}
