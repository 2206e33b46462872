use std::path::{Path, PathBuf};

use crate::types::Version;

/// Where snapshots are read from and written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLayout {
    /// Directory whose whole tree is archived.
    pub source_dir: PathBuf,
    /// Directory receiving `<version>.zip` archives.
    pub output_dir: PathBuf,
    /// File holding the next version as decimal text.
    pub counter_file: PathBuf,
}

impl Default for SnapshotLayout {
    /// `src/`, `submits/` and `submits/version.txt`, relative to the working directory.
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("submits"),
            counter_file: Path::new("submits").join("version.txt"),
        }
    }
}

impl SnapshotLayout {
    /// The default layout placed under `base` instead of the working directory.
    pub fn rooted_at(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let defaults = Self::default();
        Self {
            source_dir: base.join(defaults.source_dir),
            output_dir: base.join(defaults.output_dir),
            counter_file: base.join(defaults.counter_file),
        }
    }

    /// Path of the archive for `version`.
    pub fn archive_path(&self, version: Version) -> PathBuf {
        self.output_dir.join(format!("{version}.zip"))
    }
}
