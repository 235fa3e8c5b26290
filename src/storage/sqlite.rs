use super::SnapshotStore;
use crate::{
    config::database,
    entities::{StorageEntry, storage_entry},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, instrument};

/// A [`SnapshotStore`] persisted in the `storage_entries` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Wraps an existing connection. The table must already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `database_url` and creates the snapshot table if needed.
    pub async fn connect(database_url: &str) -> Result<Self> {
        database::ensure_database_dir(database_url)?;
        let db = database::create_connection(database_url).await?;
        database::create_tables(&db).await?;
        Ok(Self { db })
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Inserts or replaces one entry inside the caller's transaction.
async fn upsert_entry<C>(db: &C, key: &str, value: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let existing = StorageEntry::find()
        .filter(storage_entry::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(entry) = existing {
        let mut active_model: storage_entry::ActiveModel = entry.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_entry = storage_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_entry.insert(db).await?;
    }

    Ok(())
}

impl SnapshotStore for SqliteStore {
    #[instrument(skip(self))]
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let entry = StorageEntry::find()
            .filter(storage_entry::Column::Key.eq(key))
            .one(&self.db)
            .await?;
        debug!("Storage entry '{}' present: {}", key, entry.is_some());
        Ok(entry.map(|e| e.value))
    }

    #[instrument(skip(self, entries), fields(count = entries.len()))]
    async fn write(&self, entries: &[(&str, String)]) -> Result<()> {
        // All entries are replaced together or not at all
        let txn = self.db.begin().await?;
        for (key, value) in entries {
            upsert_entry(&txn, key, value).await?;
        }
        txn.commit().await?;
        debug!("Wrote {} storage entries", entries.len());
        Ok(())
    }
}
