//! Storage entry entity - One named snapshot blob in the key-value table.
//!
//! The store keeps each collection as a single JSON document under a fixed key
//! (`advisers`, `policies`, `policy_sequences`) and rewrites it on every mutation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Storage entry database model - one key, one serialized snapshot
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "storage_entries")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Entry name (e.g., `"advisers"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Serialized snapshot, a JSON document
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this entry was last rewritten
    pub updated_at: DateTime,
}

/// `StorageEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
