//! Sample data seeded on first run so the dashboard is not empty.
//!
//! Five advisers (one inactive) and four 2024 policies. The data is kept as JSON in
//! the same shape as a stored snapshot, which keeps it readable next to what ends up
//! in the database.

use crate::{
    errors::{Error, Result},
    models::{Adviser, Policy},
    storage::{ADVISERS_KEY, POLICIES_KEY},
};

const SAMPLE_ADVISERS: &str = r#"[
  { "id": 1, "name": "Rajesh Kumar", "email": "rajesh.kumar@example.com", "phone": "+91 9876543210",
    "status": "active", "region": "North", "joiningDate": "2024-01-15", "initials": "RK" },
  { "id": 2, "name": "Priya Singh", "email": "priya.singh@example.com", "phone": "+91 9876543211",
    "status": "active", "region": "South", "joiningDate": "2024-01-20", "initials": "PS" },
  { "id": 3, "name": "Amit Patel", "email": "amit.patel@example.com", "phone": "+91 9876543212",
    "status": "active", "region": "West", "joiningDate": "2024-02-01", "initials": "AP" },
  { "id": 4, "name": "Sneha Reddy", "email": "sneha.reddy@example.com", "phone": "+91 9876543213",
    "status": "inactive", "region": "South", "joiningDate": "2023-11-10", "initials": "SR" },
  { "id": 5, "name": "Vikram Mehta", "email": "vikram.mehta@example.com", "phone": "+91 9876543214",
    "status": "active", "region": "East", "joiningDate": "2023-12-05", "initials": "VM" }
]"#;

const SAMPLE_POLICIES: &str = r#"[
  { "id": "POL-2024-001", "policyNumber": "POL-2024-001", "customerName": "Arun Sharma",
    "adviserId": 1, "adviserName": "Rajesh Kumar", "policyType": "Health",
    "sumInsured": 500000, "premium": 12000, "status": "active",
    "startDate": "2024-01-15", "endDate": "2025-01-14" },
  { "id": "POL-2024-002", "policyNumber": "POL-2024-002", "customerName": "Meena Patel",
    "adviserId": 3, "adviserName": "Amit Patel", "policyType": "Life",
    "sumInsured": 1000000, "premium": 25000, "status": "active",
    "startDate": "2024-01-20", "endDate": "2025-01-19" },
  { "id": "POL-2024-003", "policyNumber": "POL-2024-003", "customerName": "Suresh Gupta",
    "adviserId": 2, "adviserName": "Priya Singh", "policyType": "Motor",
    "sumInsured": 300000, "premium": 8500, "status": "active",
    "startDate": "2024-02-01", "endDate": "2025-01-31" },
  { "id": "POL-2024-004", "policyNumber": "POL-2024-004", "customerName": "Kavita Reddy",
    "adviserId": 2, "adviserName": "Priya Singh", "policyType": "Travel",
    "sumInsured": 100000, "premium": 3500, "status": "expired",
    "startDate": "2024-02-10", "endDate": "2024-03-10" }
]"#;

/// The advisers seeded on first run.
pub fn sample_advisers() -> Result<Vec<Adviser>> {
    serde_json::from_str(SAMPLE_ADVISERS).map_err(|source| Error::Snapshot {
        key: ADVISERS_KEY.to_string(),
        source,
    })
}

/// The policies seeded on first run.
pub fn sample_policies() -> Result<Vec<Policy>> {
    serde_json::from_str(SAMPLE_POLICIES).map_err(|source| Error::Snapshot {
        key: POLICIES_KEY.to_string(),
        source,
    })
}
