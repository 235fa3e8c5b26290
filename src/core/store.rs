//! Entity store - Owns the adviser and policy collections.
//!
//! Every mutation validates its input, builds the next state on a copy, persists a
//! full snapshot through the [`SnapshotStore`] port and only then swaps the
//! in-memory state. A rejected or failed mutation leaves the store exactly as it was.
//!
//! Policies carry a materialized copy of their adviser's name (`adviser_name`).
//! Renaming an adviser rewrites that copy on every matching policy. Deleting an
//! adviser does not cascade; the affected policies keep their now dangling
//! `adviser_id` and are reported by [`EntityStore::orphaned_policies`].

use crate::{
    core::{
        ids::{AdviserIds, PolicySequences, initials_of},
        seed,
    },
    errors::{Error, Result},
    models::{Adviser, AdviserInput, Policy, PolicyInput},
    storage::{ADVISER_IDS_KEY, ADVISERS_KEY, POLICIES_KEY, SEQUENCES_KEY, SnapshotStore},
};
use chrono::{Datelike, Local, NaiveDate};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

/// Full state of the store at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// All advisers, in insertion order
    pub advisers: Vec<Adviser>,
    /// All policies, in insertion order
    pub policies: Vec<Policy>,
    /// Highest adviser id ever issued
    pub adviser_ids: AdviserIds,
    /// Per-year policy number counters
    pub sequences: PolicySequences,
}

/// The in-memory entity store backed by a durable snapshot blob.
#[derive(Debug)]
pub struct EntityStore<S> {
    storage: S,
    state: Snapshot,
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|source| Error::Snapshot {
        key: key.to_string(),
        source,
    })
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_positive(field: &'static str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { field, amount });
    }
    Ok(())
}

fn validate_adviser_fields(name: &str, phone: &str) -> Result<()> {
    require_text("Adviser name", name)?;
    require_text("Adviser phone", phone)
}

fn validate_policy_fields(
    customer_name: &str,
    sum_insured: f64,
    premium: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<()> {
    require_text("Customer name", customer_name)?;
    require_positive("sum insured", sum_insured)?;
    require_positive("premium", premium)?;
    if end_date < start_date {
        return Err(Error::validation(format!(
            "End date {end_date} is before start date {start_date}"
        )));
    }
    Ok(())
}

/// Recomputes initials that drifted from the name, returning how many changed.
fn normalize_initials(advisers: &mut [Adviser]) -> usize {
    let mut fixed = 0;
    for adviser in advisers {
        let expected = initials_of(&adviser.name);
        if adviser.initials != expected {
            adviser.initials = expected;
            fixed += 1;
        }
    }
    fixed
}

/// Forces `policy_number` to equal `id`, returning how many policies changed.
fn normalize_policy_numbers(policies: &mut [Policy]) -> usize {
    let mut fixed = 0;
    for policy in policies {
        if policy.policy_number != policy.id {
            warn!(
                "Policy {} had policy number {}; using the id as policy number",
                policy.id, policy.policy_number
            );
            policy.policy_number.clone_from(&policy.id);
            fixed += 1;
        }
    }
    fixed
}

/// Copies the current adviser name onto every policy whose adviser exists, returning
/// how many policies changed. Policies with a dangling `adviser_id` keep their name.
fn normalize_adviser_names(advisers: &[Adviser], policies: &mut [Policy]) -> usize {
    let mut fixed = 0;
    for policy in policies {
        let Some(adviser) = advisers.iter().find(|a| a.id == policy.adviser_id) else {
            continue;
        };
        if policy.adviser_name != adviser.name {
            policy.adviser_name.clone_from(&adviser.name);
            fixed += 1;
        }
    }
    fixed
}

impl<S: SnapshotStore> EntityStore<S> {
    /// Loads the store from `storage`.
    ///
    /// A collection that was never stored is seeded with the sample data when
    /// `seed_sample_data` is set, and left empty otherwise. Snapshots with initials
    /// out of step with names, with a policy number different from the policy id, or
    /// with an adviser name that differs from the adviser record, are corrected. Any seeding or correction is persisted before returning.
    #[instrument(skip(storage))]
    pub async fn open(storage: S, seed_sample_data: bool) -> Result<Self> {
        let mut dirty = false;

        let advisers = match storage.read(ADVISERS_KEY).await? {
            Some(raw) => {
                let mut advisers: Vec<Adviser> = decode(ADVISERS_KEY, &raw)?;
                let fixed = normalize_initials(&mut advisers);
                if fixed > 0 {
                    warn!("Recomputed initials for {} stored advisers", fixed);
                    dirty = true;
                }
                advisers
            }
            None if seed_sample_data => {
                info!("No stored advisers, seeding sample advisers");
                dirty = true;
                seed::sample_advisers()?
            }
            None => {
                dirty = true;
                Vec::new()
            }
        };

        let policies = match storage.read(POLICIES_KEY).await? {
            Some(raw) => {
                let mut policies: Vec<Policy> = decode(POLICIES_KEY, &raw)?;
                if normalize_policy_numbers(&mut policies) > 0 {
                    dirty = true;
                }
                policies
            }
            None if seed_sample_data => {
                info!("No stored policies, seeding sample policies");
                dirty = true;
                seed::sample_policies()?
            }
            None => {
                dirty = true;
                Vec::new()
            }
        };

        let mut policies = policies;
        let renamed = normalize_adviser_names(&advisers, &mut policies);
        if renamed > 0 {
            warn!("Synced adviser names on {} stored policies", renamed);
            dirty = true;
        }

        let mut adviser_ids = match storage.read(ADVISER_IDS_KEY).await? {
            Some(raw) => decode(ADVISER_IDS_KEY, &raw)?,
            None => {
                dirty = true;
                AdviserIds::default()
            }
        };
        let before = adviser_ids;
        adviser_ids.observe(&advisers);
        dirty |= before != adviser_ids;

        let mut sequences = match storage.read(SEQUENCES_KEY).await? {
            Some(raw) => decode(SEQUENCES_KEY, &raw)?,
            None => {
                dirty = true;
                PolicySequences::new()
            }
        };
        let before = sequences.clone();
        sequences.observe(&policies);
        dirty |= before != sequences;

        let mut store = Self {
            storage,
            state: Snapshot::default(),
        };
        let loaded = Snapshot {
            advisers,
            policies,
            adviser_ids,
            sequences,
        };
        if dirty {
            store.commit(loaded).await?;
        } else {
            store.state = loaded;
        }

        info!(
            "Entity store ready with {} advisers and {} policies",
            store.state.advisers.len(),
            store.state.policies.len()
        );
        Ok(store)
    }

    /// Persists `next` and makes it the current state.
    async fn commit(&mut self, next: Snapshot) -> Result<()> {
        let entries = [
            (ADVISERS_KEY, serde_json::to_string(&next.advisers)?),
            (POLICIES_KEY, serde_json::to_string(&next.policies)?),
            (ADVISER_IDS_KEY, serde_json::to_string(&next.adviser_ids)?),
            (SEQUENCES_KEY, serde_json::to_string(&next.sequences)?),
        ];
        self.storage.write(&entries).await?;
        debug!(
            "Persisted snapshot: {} advisers, {} policies",
            next.advisers.len(),
            next.policies.len()
        );
        self.state = next;
        Ok(())
    }

    /// Creates an adviser, assigning its id and initials.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn add_adviser(&mut self, input: AdviserInput) -> Result<Adviser> {
        validate_adviser_fields(&input.name, &input.phone)?;

        let mut next = self.state.clone();
        let name = input.name.trim().to_string();
        let adviser = Adviser {
            id: next.adviser_ids.next_adviser_id(&next.advisers),
            initials: initials_of(&name),
            name,
            phone: input.phone.trim().to_string(),
            email: input.email.trim().to_string(),
            joining_date: input.joining_date,
            region: input.region,
            status: input.status,
        };

        next.advisers.push(adviser.clone());
        self.commit(next).await?;

        info!("Added adviser {} ({})", adviser.id, adviser.name);
        Ok(adviser)
    }

    /// Replaces the adviser with the same id.
    ///
    /// Initials are recomputed from the new name and the name is copied onto every
    /// policy the adviser owns.
    #[instrument(skip(self, adviser), fields(id = adviser.id))]
    pub async fn update_adviser(&mut self, adviser: Adviser) -> Result<Adviser> {
        validate_adviser_fields(&adviser.name, &adviser.phone)?;

        let index = self
            .state
            .advisers
            .iter()
            .position(|a| a.id == adviser.id)
            .ok_or(Error::AdviserNotFound { id: adviser.id })?;

        let name = adviser.name.trim().to_string();
        let updated = Adviser {
            initials: initials_of(&name),
            name,
            phone: adviser.phone.trim().to_string(),
            email: adviser.email.trim().to_string(),
            ..adviser
        };

        let mut next = self.state.clone();
        next.advisers[index] = updated.clone();
        let mut renamed = 0;
        for policy in next
            .policies
            .iter_mut()
            .filter(|p| p.adviser_id == updated.id)
        {
            if policy.adviser_name != updated.name {
                policy.adviser_name.clone_from(&updated.name);
                renamed += 1;
            }
        }
        self.commit(next).await?;

        info!(
            "Updated adviser {} ({}); {} policies renamed",
            updated.id, updated.name, renamed
        );
        Ok(updated)
    }

    /// Removes an adviser. Their policies are left in place.
    #[instrument(skip(self))]
    pub async fn delete_adviser(&mut self, id: i64) -> Result<Adviser> {
        let index = self
            .state
            .advisers
            .iter()
            .position(|a| a.id == id)
            .ok_or(Error::AdviserNotFound { id })?;

        let mut next = self.state.clone();
        let removed = next.advisers.remove(index);
        let dangling = next.policies.iter().filter(|p| p.adviser_id == id).count();
        self.commit(next).await?;

        if dangling > 0 {
            warn!(
                "Deleted adviser {} still owns {} policies; they now reference a missing adviser",
                id, dangling
            );
        }
        info!("Deleted adviser {} ({})", removed.id, removed.name);
        Ok(removed)
    }

    /// Creates a policy numbered in the current calendar year.
    pub async fn add_policy(&mut self, input: PolicyInput) -> Result<Policy> {
        let year = Local::now().year();
        self.add_policy_in_year(input, year).await
    }

    /// Creates a policy numbered in `year`.
    ///
    /// The adviser must exist and be active. The policy number comes from the
    /// persisted per-year counter and is used as both `id` and `policy_number`.
    #[instrument(skip(self, input), fields(adviser_id = input.adviser_id))]
    pub async fn add_policy_in_year(&mut self, input: PolicyInput, year: i32) -> Result<Policy> {
        validate_policy_fields(
            &input.customer_name,
            input.sum_insured,
            input.premium,
            input.start_date,
            input.end_date,
        )?;

        let adviser = self.adviser(input.adviser_id).ok_or_else(|| {
            Error::validation(format!("Adviser {} does not exist", input.adviser_id))
        })?;
        if !adviser.is_active() {
            return Err(Error::validation(format!(
                "Adviser {} ({}) is inactive and cannot take new policies",
                adviser.id, adviser.name
            )));
        }
        let adviser_name = adviser.name.clone();

        let mut next = self.state.clone();
        let number = next.sequences.next_policy_number(&next.policies, year);
        let policy = Policy {
            id: number.clone(),
            policy_number: number,
            customer_name: input.customer_name.trim().to_string(),
            adviser_id: input.adviser_id,
            adviser_name,
            policy_type: input.policy_type,
            sum_insured: input.sum_insured,
            premium: input.premium,
            status: input.status,
            start_date: input.start_date,
            end_date: input.end_date,
        };
        next.policies.push(policy.clone());
        self.commit(next).await?;

        info!(
            "Added policy {} for adviser {} ({})",
            policy.id, policy.adviser_id, policy.adviser_name
        );
        Ok(policy)
    }

    /// Replaces the policy with the same id.
    ///
    /// `policy_number` must equal `id`. The adviser name is taken from the adviser
    /// record when it exists. Moving a policy to another adviser requires that adviser
    /// to exist and be active, as for new policies. A policy may stay with its current
    /// adviser even if that adviser is inactive or was deleted.
    #[instrument(skip(self, policy), fields(id = %policy.id))]
    pub async fn update_policy(&mut self, policy: Policy) -> Result<Policy> {
        validate_policy_fields(
            &policy.customer_name,
            policy.sum_insured,
            policy.premium,
            policy.start_date,
            policy.end_date,
        )?;
        if policy.policy_number != policy.id {
            return Err(Error::validation(format!(
                "Policy number {} must match policy id {}",
                policy.policy_number, policy.id
            )));
        }

        let index = self
            .state
            .policies
            .iter()
            .position(|p| p.id == policy.id)
            .ok_or_else(|| Error::PolicyNotFound {
                id: policy.id.clone(),
            })?;
        let current = &self.state.policies[index];

        let reassigned = policy.adviser_id != current.adviser_id;
        let adviser_name = match self.adviser(policy.adviser_id) {
            Some(adviser) if reassigned && !adviser.is_active() => {
                return Err(Error::validation(format!(
                    "Adviser {} ({}) is inactive and cannot take over policies",
                    adviser.id, adviser.name
                )));
            }
            Some(adviser) => adviser.name.clone(),
            None if !reassigned => current.adviser_name.clone(),
            None => {
                return Err(Error::validation(format!(
                    "Adviser {} does not exist",
                    policy.adviser_id
                )));
            }
        };

        let updated = Policy {
            customer_name: policy.customer_name.trim().to_string(),
            adviser_name,
            ..policy
        };

        let mut next = self.state.clone();
        next.policies[index] = updated.clone();
        self.commit(next).await?;

        info!("Updated policy {}", updated.id);
        Ok(updated)
    }

    /// Removes a policy.
    #[instrument(skip(self))]
    pub async fn delete_policy(&mut self, id: &str) -> Result<Policy> {
        let index = self
            .state
            .policies
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::PolicyNotFound { id: id.to_string() })?;

        let mut next = self.state.clone();
        let removed = next.policies.remove(index);
        self.commit(next).await?;

        info!("Deleted policy {}", removed.id);
        Ok(removed)
    }

    /// Current state.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    /// All advisers, in insertion order.
    #[must_use]
    pub fn advisers(&self) -> &[Adviser] {
        &self.state.advisers
    }

    /// All policies, in insertion order.
    #[must_use]
    pub fn policies(&self) -> &[Policy] {
        &self.state.policies
    }

    /// Looks up an adviser by id.
    #[must_use]
    pub fn adviser(&self, id: i64) -> Option<&Adviser> {
        self.state.advisers.iter().find(|a| a.id == id)
    }

    /// Looks up a policy by id.
    #[must_use]
    pub fn policy(&self, id: &str) -> Option<&Policy> {
        self.state.policies.iter().find(|p| p.id == id)
    }

    /// Advisers that can be assigned new policies.
    #[must_use]
    pub fn active_advisers(&self) -> Vec<&Adviser> {
        self.state.advisers.iter().filter(|a| a.is_active()).collect()
    }

    /// Policies owned by the given adviser.
    #[must_use]
    pub fn policies_for_adviser(&self, adviser_id: i64) -> Vec<&Policy> {
        self.state
            .policies
            .iter()
            .filter(|p| p.adviser_id == adviser_id)
            .collect()
    }

    /// Policies whose adviser no longer exists.
    #[must_use]
    pub fn orphaned_policies(&self) -> Vec<&Policy> {
        self.state
            .policies
            .iter()
            .filter(|p| self.adviser(p.adviser_id).is_none())
            .collect()
    }

    /// The persistence port.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the store, returning the persistence port.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }
}
