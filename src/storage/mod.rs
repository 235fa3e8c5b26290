//! Persistence port for the entity store.
//!
//! The store never talks to a database directly. It reads and writes named JSON
//! snapshots through [`SnapshotStore`], which lets tests swap the SQLite table for
//! an in-memory map.

/// In-memory implementation used by tests and embedders without a database
pub mod memory;
/// SQLite implementation backed by the `storage_entries` table
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::errors::Result;

/// Key of the serialized adviser collection.
pub const ADVISERS_KEY: &str = "advisers";
/// Key of the serialized policy collection.
pub const POLICIES_KEY: &str = "policies";
/// Key of the adviser id counter.
pub const ADVISER_IDS_KEY: &str = "adviser_ids";
/// Key of the per-year policy number counters.
pub const SEQUENCES_KEY: &str = "policy_sequences";

/// Durable key-value blob holding whole-collection snapshots.
///
/// `write` must be all-or-nothing: either every entry is replaced or none is.
#[allow(async_fn_in_trait)]
pub trait SnapshotStore {
    /// Returns the stored value for `key`, or `None` if it was never written.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the given entries in one atomic write.
    async fn write(&self, entries: &[(&str, String)]) -> Result<()>;
}
