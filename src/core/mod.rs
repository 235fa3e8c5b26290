//! Core business logic - framework-agnostic store, metrics and query operations.

/// Identifier and initials generation
pub mod ids;
/// Derived dashboard metrics
pub mod metrics;
/// Search and filtering for list views
pub mod query;
/// Plain-text report formatting
pub mod report;
/// Sample data for first run
pub mod seed;
/// The entity store
pub mod store;

pub use store::{EntityStore, Snapshot};
