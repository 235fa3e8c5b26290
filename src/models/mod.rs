//! Domain records shared by the store, the metrics engine and the query layer.
//!
//! Field names serialize in camelCase and enum values use the labels the dashboard
//! shows (`"active"`, `"North"`, `"Senior Citizen"`), so snapshots stay readable by
//! the front end that consumes them.

/// Advisers (sales agents) and their enumerations
pub mod adviser;
/// Policies (insurance contracts) and their enumerations
pub mod policy;

pub use adviser::{Adviser, AdviserInput, AdviserStatus, Region};
pub use policy::{Policy, PolicyInput, PolicyStatus, PolicyType};
