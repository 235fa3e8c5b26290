//! Policy records.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Line of insurance a policy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyType {
    /// Health cover
    Health,
    /// Life cover
    Life,
    /// Motor vehicle cover
    Motor,
    /// Travel cover
    Travel,
    /// Property cover
    Property,
    /// Family floater cover
    Family,
    /// Senior citizen health cover
    #[serde(rename = "Senior Citizen")]
    SeniorCitizen,
}

impl PolicyType {
    /// Every policy type, in the order the add-policy form offers them.
    pub const ALL: [Self; 7] = [
        Self::Health,
        Self::Life,
        Self::Motor,
        Self::Travel,
        Self::Property,
        Self::Family,
        Self::SeniorCitizen,
    ];

    /// Display label, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "Health",
            Self::Life => "Life",
            Self::Motor => "Motor",
            Self::Travel => "Travel",
            Self::Property => "Property",
            Self::Family => "Family",
            Self::SeniorCitizen => "Senior Citizen",
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation(format!("Unknown policy type '{s}'")))
    }
}

/// Whether a policy is in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStatus {
    /// In force
    Active,
    /// Lapsed or past its end date
    Expired,
}

impl PolicyStatus {
    /// Serialized label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            other => Err(Error::validation(format!("Unknown policy status '{other}'"))),
        }
    }
}

/// An insurance contract sold by an adviser.
///
/// `id` and `policy_number` always carry the same `POL-<year>-<seq>` value. Both are
/// kept because the persisted snapshot format has both fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Unique identifier, assigned by the store
    pub id: String,
    /// Human-facing policy number, equal to `id`
    pub policy_number: String,
    /// Name of the insured customer
    pub customer_name: String,
    /// Owning adviser
    pub adviser_id: i64,
    /// Copy of the owning adviser's name, kept in sync on adviser renames
    pub adviser_name: String,
    /// Line of insurance
    pub policy_type: PolicyType,
    /// Cover amount
    pub sum_insured: f64,
    /// Premium amount
    pub premium: f64,
    /// Whether the policy is in force
    pub status: PolicyStatus,
    /// Cover start date
    pub start_date: NaiveDate,
    /// Cover end date
    pub end_date: NaiveDate,
}

impl Policy {
    /// True while the policy is in force.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }
}

/// Fields a caller supplies when creating a policy. The store assigns the id and
/// policy number and copies the adviser's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyInput {
    /// Name of the insured customer
    pub customer_name: String,
    /// Owning adviser; must be an existing active adviser
    pub adviser_id: i64,
    /// Line of insurance
    pub policy_type: PolicyType,
    /// Cover amount
    pub sum_insured: f64,
    /// Premium amount
    pub premium: f64,
    /// Initial status
    pub status: PolicyStatus,
    /// Cover start date
    pub start_date: NaiveDate,
    /// Cover end date
    pub end_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_senior_citizen_round_trips_with_space() {
        let json = serde_json::to_string(&PolicyType::SeniorCitizen).unwrap();
        assert_eq!(json, "\"Senior Citizen\"");
        let parsed: PolicyType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PolicyType::SeniorCitizen);
        assert_eq!(
            "senior citizen".parse::<PolicyType>().unwrap(),
            PolicyType::SeniorCitizen
        );
    }

    #[test]
    fn test_policy_deserializes_dashboard_json() {
        let json = r#"{
            "id": "POL-2024-001",
            "policyNumber": "POL-2024-001",
            "customerName": "Arun Sharma",
            "adviserId": 1,
            "adviserName": "Rajesh Kumar",
            "policyType": "Health",
            "sumInsured": 500000,
            "premium": 12000,
            "status": "active",
            "startDate": "2024-01-15",
            "endDate": "2025-01-14"
        }"#;

        let policy: Policy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.id, "POL-2024-001");
        assert_eq!(policy.adviser_id, 1);
        assert_eq!(policy.policy_type, PolicyType::Health);
        assert!(policy.is_active());
        assert_eq!(
            policy.start_date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_policy_status_parse() {
        assert_eq!(" EXPIRED".parse::<PolicyStatus>().unwrap(), PolicyStatus::Expired);
        assert!("cancelled".parse::<PolicyStatus>().is_err());
    }
}
