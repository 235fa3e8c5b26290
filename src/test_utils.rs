//! Shared test utilities.
//!
//! Helpers for building stores over an in-memory snapshot blob and for creating
//! advisers and policies with sensible defaults.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use crate::{
    core::{ids::initials_of, store::EntityStore},
    errors::Result,
    models::{
        Adviser, AdviserInput, AdviserStatus, Policy, PolicyInput, PolicyStatus, PolicyType,
        Region,
    },
    storage::MemoryStore,
};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

/// Installs a tracing subscriber that writes through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Shorthand for a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// An empty store over a fresh in-memory blob, without sample data.
pub async fn setup_empty_store() -> Result<EntityStore<MemoryStore>> {
    EntityStore::open(MemoryStore::new(), false).await
}

/// A store seeded with the five sample advisers and four sample policies.
pub async fn setup_seeded_store() -> Result<EntityStore<MemoryStore>> {
    EntityStore::open(MemoryStore::new(), true).await
}

/// An active North adviser built directly, bypassing the store.
///
/// # Defaults
/// * `region`: North
/// * `status`: active
/// * `joining_date`: 2024-01-01
pub fn sample_adviser(id: i64, name: &str) -> Adviser {
    Adviser {
        id,
        name: name.to_string(),
        phone: format!("+91 90000000{id:02}"),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        joining_date: date(2024, 1, 1),
        region: Region::North,
        status: AdviserStatus::Active,
        initials: initials_of(name),
    }
}

/// An active Health policy built directly, bypassing the store.
///
/// # Defaults
/// * `sum_insured`: 100000
/// * `start_date`: 2024-01-15, `end_date`: 2025-01-14
/// * `adviser_name`: `"Adviser <id>"`
pub fn sample_policy(id: &str, adviser_id: i64, premium: f64) -> Policy {
    Policy {
        id: id.to_string(),
        policy_number: id.to_string(),
        customer_name: "Test Customer".to_string(),
        adviser_id,
        adviser_name: format!("Adviser {adviser_id}"),
        policy_type: PolicyType::Health,
        sum_insured: 100_000.0,
        premium,
        status: PolicyStatus::Active,
        start_date: date(2024, 1, 15),
        end_date: date(2025, 1, 14),
    }
}

/// Same as [`sample_policy`] with an explicit start date and status.
pub fn dated_policy(
    id: &str,
    adviser_id: i64,
    premium: f64,
    start_date: NaiveDate,
    status: PolicyStatus,
) -> Policy {
    Policy {
        start_date,
        end_date: start_date,
        status,
        ..sample_policy(id, adviser_id, premium)
    }
}

/// Valid adviser input for `name`.
pub fn adviser_input(name: &str) -> AdviserInput {
    AdviserInput {
        name: name.to_string(),
        phone: "+91 9000000000".to_string(),
        email: "adviser@example.com".to_string(),
        joining_date: date(2024, 3, 1),
        region: Region::Central,
        status: AdviserStatus::Active,
    }
}

/// Valid policy input for `adviser_id` with the given premium.
pub fn policy_input(adviser_id: i64, premium: f64) -> PolicyInput {
    PolicyInput {
        customer_name: "Test Customer".to_string(),
        adviser_id,
        policy_type: PolicyType::Life,
        sum_insured: 250_000.0,
        premium,
        status: PolicyStatus::Active,
        start_date: date(2024, 6, 1),
        end_date: date(2025, 5, 31),
    }
}
