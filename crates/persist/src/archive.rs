//! Zip archiving of a directory tree.
//!
//! Entry layout inside the archive:
//! ```text
//! top.txt          - files of the source root
//! nested/          - one directory entry per sub-directory
//! nested/inner.bin - paths relative to the source root, `/`-separated
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, trace};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::snapshot::{SnapshotError, SnapshotResult};

/// What went into a freshly written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub files: usize,
    pub directories: usize,
    /// Lowercase hex SHA-256 of the archive file.
    pub sha256: String,
}

impl ArchiveSummary {
    pub fn entries(&self) -> usize {
        self.files + self.directories
    }
}

/// Write the full contents of `source` into a new zip file at `dest`.
///
/// `dest` is truncated if it exists; its parent directory must exist.
/// Nothing is created when `source` is not a directory. Only regular files
/// and directories are stored: dangling links, pipes, sockets and devices
/// are skipped.
pub fn archive_directory(source: &Path, dest: &Path) -> SnapshotResult<ArchiveSummary> {
    if !source.is_dir() {
        return Err(SnapshotError::SourceMissing(source.to_path_buf()));
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut files = 0;
    let mut directories = 0;

    // Links are resolved per entry below rather than followed by the walker,
    // so a link to an ancestor cannot loop.
    let walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        let name = entry_name(source, entry.path())?;
        let kind = if entry.path_is_symlink() {
            match std::fs::metadata(entry.path()) {
                Ok(meta) => meta.file_type(),
                Err(e) => {
                    debug!(entry = %name, error = %e, "skipping unresolvable link");
                    continue;
                }
            }
        } else {
            entry.file_type()
        };

        if kind.is_dir() {
            trace!(entry = %name, "adding directory");
            writer.add_directory(format!("{name}/"), options)?;
            directories += 1;
        } else if kind.is_file() {
            trace!(entry = %name, "adding file");
            writer.start_file(name, options)?;
            let mut input = File::open(entry.path())?;
            io::copy(&mut input, &mut writer)?;
            files += 1;
        } else {
            // Pipes, sockets and devices have no stable contents; opening a
            // FIFO would also block until a writer shows up.
            debug!(entry = %name, "skipping special file");
        }
    }

    let mut file = writer.finish()?;
    file.seek(SeekFrom::Start(0))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;

    Ok(ArchiveSummary {
        files,
        directories,
        sha256: format!("{:x}", hasher.finalize()),
    })
}

/// Archive entry name for `path`: relative to `root`, joined with `/`.
///
/// Zip entry names are text, so a non-UTF-8 component is an error rather
/// than being replaced (two lossy names could collide).
fn entry_name(root: &Path, path: &Path) -> SnapshotResult<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        SnapshotError::Io(io::Error::other(format!(
            "{} is outside {}",
            path.display(),
            root.display()
        )))
    })?;
    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str()
                .to_str()
                .ok_or_else(|| SnapshotError::NonUtf8Name(path.to_path_buf()))
        })
        .collect::<SnapshotResult<Vec<_>>>()?;
    Ok(parts.join("/"))
}
