//! Entity module - Contains the SeaORM entity definitions for the database.
//! The store only needs a key-value table, so there is a single entity.

pub mod storage_entry;

pub use storage_entry::{
    Column as StorageEntryColumn, Entity as StorageEntry, Model as StorageEntryModel,
};
