//! Identifier generation.
//!
//! Adviser ids and policy numbers both come from counters persisted alongside the
//! collections, so neither is handed out twice even after the record holding it was
//! deleted. Policy numbers are `POL-<year>-<seq>` with one counter per year.

use crate::models::{Adviser, Policy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Returns the id for a new adviser: one past the highest existing id, or `1`.
#[must_use]
pub fn next_adviser_id(existing: &[Adviser]) -> i64 {
    existing
        .iter()
        .map(|adviser| adviser.id)
        .max()
        .map_or(1, |max| max + 1)
}

/// Highest adviser id ever issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdviserIds(i64);

impl AdviserIds {
    /// Last id issued, `0` if none.
    #[must_use]
    pub const fn last_issued(self) -> i64 {
        self.0
    }

    /// Raises the counter to the highest id present in `advisers`.
    pub fn observe(&mut self, advisers: &[Adviser]) {
        if let Some(max) = advisers.iter().map(|adviser| adviser.id).max() {
            self.0 = self.0.max(max);
        }
    }

    /// Issues the next adviser id and records it.
    ///
    /// The id is past both the counter and every id in `existing`, so deleting the
    /// adviser with the highest id does not free that id for reuse.
    pub fn next_adviser_id(&mut self, existing: &[Adviser]) -> i64 {
        let next = next_adviser_id(existing).max(self.0.saturating_add(1));
        self.0 = next;
        next
    }
}

/// Uppercased first letters of the first two whitespace-separated tokens.
#[must_use]
pub fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Formats a policy number, zero-padding the sequence to three digits.
#[must_use]
pub fn format_policy_number(year: i32, seq: u32) -> String {
    format!("POL-{year}-{seq:03}")
}

/// Splits a `POL-<year>-<seq>` number into its year and sequence.
#[must_use]
pub fn parse_policy_number(number: &str) -> Option<(i32, u32)> {
    let rest = number.strip_prefix("POL-")?;
    let (year, seq) = rest.split_once('-')?;
    Some((year.parse().ok()?, seq.parse().ok()?))
}

fn count_in_year(existing: &[Policy], year: i32) -> u32 {
    let prefix = format!("POL-{year}");
    let count = existing
        .iter()
        .filter(|policy| policy.id.contains(&prefix))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Count-based numbering: one past the number of policies whose id mentions the
/// year.
///
/// Deleting a policy and adding another can reproduce an existing number. The store
/// uses [`PolicySequences`] instead.
#[must_use]
pub fn legacy_policy_number(existing: &[Policy], year: i32) -> String {
    format_policy_number(year, count_in_year(existing, year).saturating_add(1))
}

/// Last issued policy sequence per year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicySequences(BTreeMap<i32, u32>);

impl PolicySequences {
    /// Creates an empty set of counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last sequence issued for `year`, `0` if none.
    #[must_use]
    pub fn last_issued(&self, year: i32) -> u32 {
        self.0.get(&year).copied().unwrap_or(0)
    }

    /// Raises the counters so they are at least the highest sequence present in
    /// `policies`. Used when loading snapshots written without counters.
    pub fn observe(&mut self, policies: &[Policy]) {
        for (year, seq) in policies
            .iter()
            .filter_map(|policy| parse_policy_number(&policy.id))
        {
            let entry = self.0.entry(year).or_insert(0);
            *entry = (*entry).max(seq);
        }
    }

    /// Issues the next policy number for `year` and records it.
    ///
    /// The sequence is past the stored counter, past every sequence already used
    /// in `existing` and past the count of that year's policies.
    pub fn next_policy_number(&mut self, existing: &[Policy], year: i32) -> String {
        let highest_used = existing
            .iter()
            .filter_map(|policy| parse_policy_number(&policy.id))
            .filter(|(y, _)| *y == year)
            .map(|(_, seq)| seq)
            .max()
            .unwrap_or(0);
        let next = self
            .last_issued(year)
            .max(highest_used)
            .max(count_in_year(existing, year))
            .saturating_add(1);
        self.0.insert(year, next);
        format_policy_number(year, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_adviser, sample_policy};

    #[test]
    fn test_next_adviser_id_empty_is_one() {
        assert_eq!(next_adviser_id(&[]), 1);
    }

    #[test]
    fn test_next_adviser_id_uses_max_not_len() {
        let advisers = vec![sample_adviser(2, "Priya Singh"), sample_adviser(7, "Amit Patel")];
        assert_eq!(next_adviser_id(&advisers), 8);
    }

    #[test]
    fn test_adviser_ids_skip_deleted_maximum() {
        let mut ids = AdviserIds::default();
        let mut advisers = Vec::new();
        for name in ["A One", "B Two"] {
            let id = ids.next_adviser_id(&advisers);
            advisers.push(sample_adviser(id, name));
        }

        advisers.pop();
        assert_eq!(next_adviser_id(&advisers), 2);
        assert_eq!(ids.next_adviser_id(&advisers), 3);
        assert_eq!(ids.last_issued(), 3);
    }

    #[test]
    fn test_adviser_ids_observe_existing() {
        let mut ids = AdviserIds::default();
        ids.observe(&[sample_adviser(4, "Sneha Reddy"), sample_adviser(2, "Priya Singh")]);
        assert_eq!(ids.last_issued(), 4);
        ids.observe(&[]);
        assert_eq!(ids.last_issued(), 4);
        assert_eq!(serde_json::to_string(&ids).unwrap_or_default(), "4");
    }

    #[test]
    fn test_initials_two_tokens() {
        assert_eq!(initials_of("Rajesh Kumar"), "RK");
        assert_eq!(initials_of("priya singh"), "PS");
    }

    #[test]
    fn test_initials_only_first_two_tokens() {
        assert_eq!(initials_of("Anil Kumar Sharma"), "AK");
    }

    #[test]
    fn test_initials_single_token_and_empty() {
        assert_eq!(initials_of("Madonna"), "M");
        assert_eq!(initials_of(""), "");
        assert_eq!(initials_of("   "), "");
    }

    #[test]
    fn test_initials_ignore_repeated_whitespace() {
        assert_eq!(initials_of("  sneha   reddy "), "SR");
    }

    #[test]
    fn test_format_and_parse_policy_number() {
        assert_eq!(format_policy_number(2024, 7), "POL-2024-007");
        assert_eq!(format_policy_number(2024, 1234), "POL-2024-1234");
        assert_eq!(parse_policy_number("POL-2024-007"), Some((2024, 7)));
        assert_eq!(parse_policy_number("POL-2024-"), None);
        assert_eq!(parse_policy_number("INV-2024-001"), None);
    }

    #[test]
    fn test_legacy_numbering_repeats_after_delete() {
        let mut policies = vec![
            sample_policy("POL-2025-001", 1, 1000.0),
            sample_policy("POL-2025-002", 1, 1000.0),
        ];
        assert_eq!(legacy_policy_number(&policies, 2025), "POL-2025-003");

        // Removing the first policy makes the count-based scheme reissue 002
        policies.remove(0);
        assert_eq!(legacy_policy_number(&policies, 2025), "POL-2025-002");
    }

    #[test]
    fn test_sequences_never_reissue_after_delete() {
        let mut sequences = PolicySequences::new();
        let mut policies = Vec::new();

        for _ in 0..3 {
            let number = sequences.next_policy_number(&policies, 2025);
            policies.push(sample_policy(&number, 1, 1000.0));
        }
        assert_eq!(policies[2].id, "POL-2025-003");

        policies.remove(1);
        let number = sequences.next_policy_number(&policies, 2025);
        assert_eq!(number, "POL-2025-004");
        assert!(policies.iter().all(|p| p.id != number));
    }

    #[test]
    fn test_sequences_are_per_year() {
        let mut sequences = PolicySequences::new();
        assert_eq!(sequences.next_policy_number(&[], 2024), "POL-2024-001");
        assert_eq!(sequences.next_policy_number(&[], 2024), "POL-2024-002");
        assert_eq!(sequences.next_policy_number(&[], 2025), "POL-2025-001");
        assert_eq!(sequences.last_issued(2024), 2);
        assert_eq!(sequences.last_issued(2023), 0);
    }

    #[test]
    fn test_sequences_skip_past_existing_numbers() {
        let policies = vec![sample_policy("POL-2025-010", 1, 1000.0)];
        let mut sequences = PolicySequences::new();
        assert_eq!(
            sequences.next_policy_number(&policies, 2025),
            "POL-2025-011"
        );
    }

    #[test]
    fn test_observe_raises_counters() {
        let policies = vec![
            sample_policy("POL-2024-003", 1, 1000.0),
            sample_policy("POL-2024-001", 1, 1000.0),
            sample_policy("legacy-id", 1, 1000.0),
        ];
        let mut sequences = PolicySequences::new();
        sequences.observe(&policies);
        assert_eq!(sequences.last_issued(2024), 3);
    }

    #[test]
    fn test_sequences_serialize_as_year_map() {
        let mut sequences = PolicySequences::new();
        sequences.next_policy_number(&[], 2024);
        let json = serde_json::to_string(&sequences).unwrap_or_default();
        assert_eq!(json, r#"{"2024":1}"#);
        let parsed: PolicySequences = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(parsed, sequences);
    }
}
