//! Persistence: version counter storage, directory archiving, the snapshot run.
//!
//! # Invariants
//! - The archive of a run is named with the counter value read at its start.
//! - The counter is only advanced after the archive is fully written.
//! - An unreadable counter means version zero; every other failure propagates.

pub mod archive;
pub mod counter;
pub mod snapshot;

pub use archive::{ArchiveSummary, archive_directory};
pub use counter::{CounterError, CounterStore, FileCounter, MemoryCounter};
pub use snapshot::{SnapshotError, SnapshotReceipt, SnapshotResult, Snapshotter};
