//! Adviser records.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Sales region an adviser is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// North region
    North,
    /// South region
    South,
    /// East region
    East,
    /// West region
    West,
    /// Central region
    Central,
}

impl Region {
    /// Every region, in the order the dashboard lists them.
    pub const ALL: [Self; 5] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::Central,
    ];

    /// Display label, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::Central => "Central",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|region| region.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation(format!("Unknown region '{s}'")))
    }
}

/// Employment status of an adviser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviserStatus {
    /// Currently selling; offered when creating policies
    Active,
    /// No longer selling; existing policies stay attached
    Inactive,
}

impl AdviserStatus {
    /// Serialized label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AdviserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdviserStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(Error::validation(format!("Unknown adviser status '{other}'"))),
        }
    }
}

/// A sales agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adviser {
    /// Unique identifier, assigned by the store
    pub id: i64,
    /// Full name
    pub name: String,
    /// Contact phone number
    pub phone: String,
    /// Contact email address
    pub email: String,
    /// Date the adviser joined the agency
    pub joining_date: NaiveDate,
    /// Assigned sales region
    pub region: Region,
    /// Whether the adviser is currently active
    pub status: AdviserStatus,
    /// Display initials derived from `name`; recomputed by the store on every write
    pub initials: String,
}

impl Adviser {
    /// True when the adviser may be assigned new policies.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AdviserStatus::Active
    }
}

/// Fields a caller supplies when creating an adviser. The store assigns `id` and
/// `initials`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviserInput {
    /// Full name
    pub name: String,
    /// Contact phone number
    pub phone: String,
    /// Contact email address
    pub email: String,
    /// Date the adviser joined the agency
    pub joining_date: NaiveDate,
    /// Assigned sales region
    pub region: Region,
    /// Initial status
    pub status: AdviserStatus,
}
