//! Search and filtering for the adviser and policy list views.
//!
//! All functions accept anything that iterates over references, so their outputs can
//! be fed into one another. Filters combine with logical AND and the order they are
//! applied in does not change the result.

use crate::{
    errors::{Error, Result},
    models::{Adviser, AdviserStatus, Policy, PolicyStatus, PolicyType, Region},
};
use std::{borrow::Cow, str::FromStr};

/// A record whose text fields can be searched.
pub trait Searchable {
    /// The searchable fields of this record type.
    type Field: Copy;

    /// Text of `field` for this record.
    fn field_text(&self, field: Self::Field) -> Cow<'_, str>;
}

/// A record with a status that list views filter on.
pub trait HasStatus {
    /// The status type.
    type Status: Copy + PartialEq;

    /// Current status.
    fn status(&self) -> Self::Status;
}

/// Searchable adviser fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviserField {
    /// Full name
    Name,
    /// Email address
    Email,
    /// Phone number
    Phone,
    /// Region label
    Region,
}

impl AdviserField {
    /// Fields searched by the adviser list view.
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Phone, Self::Region];
}

/// Searchable policy fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyField {
    /// Policy id / number
    Id,
    /// Customer name
    CustomerName,
    /// Owning adviser's name
    AdviserName,
    /// Policy type label
    PolicyType,
}

impl PolicyField {
    /// Fields searched by the policy list view.
    pub const ALL: [Self; 4] = [
        Self::Id,
        Self::CustomerName,
        Self::AdviserName,
        Self::PolicyType,
    ];
}

impl Searchable for Adviser {
    type Field = AdviserField;

    fn field_text(&self, field: AdviserField) -> Cow<'_, str> {
        match field {
            AdviserField::Name => Cow::Borrowed(&self.name),
            AdviserField::Email => Cow::Borrowed(&self.email),
            AdviserField::Phone => Cow::Borrowed(&self.phone),
            AdviserField::Region => Cow::Borrowed(self.region.as_str()),
        }
    }
}

impl Searchable for Policy {
    type Field = PolicyField;

    fn field_text(&self, field: PolicyField) -> Cow<'_, str> {
        match field {
            PolicyField::Id => Cow::Borrowed(&self.id),
            PolicyField::CustomerName => Cow::Borrowed(&self.customer_name),
            PolicyField::AdviserName => Cow::Borrowed(&self.adviser_name),
            PolicyField::PolicyType => Cow::Borrowed(self.policy_type.as_str()),
        }
    }
}

impl HasStatus for Adviser {
    type Status = AdviserStatus;

    fn status(&self) -> AdviserStatus {
        self.status
    }
}

impl HasStatus for Policy {
    type Status = PolicyStatus;

    fn status(&self) -> PolicyStatus {
        self.status
    }
}

/// Either no restriction or a single accepted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    /// Accept everything
    All,
    /// Accept only this value
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Filter<T> {
    /// True when `value` passes the filter.
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

/// Parses `"all"` (any case) as [`Filter::All`] and anything else as a value.
impl<T> FromStr for Filter<T>
where
    T: FromStr<Err = Error>,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Status filter for advisers or policies.
pub type StatusFilter<S> = Filter<S>;
/// Policy type filter.
pub type TypeFilter = Filter<PolicyType>;

/// Items where any of `fields` contains `term`, ignoring case. An empty or blank
/// term matches everything.
pub fn search<'a, T, I>(items: I, term: &str, fields: &[T::Field]) -> Vec<&'a T>
where
    T: Searchable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.into_iter().collect();
    }
    items
        .into_iter()
        .filter(|item| matches_term(*item, &needle, fields))
        .collect()
}

fn matches_term<T: Searchable>(item: &T, needle: &str, fields: &[T::Field]) -> bool {
    fields
        .iter()
        .any(|field| item.field_text(*field).to_lowercase().contains(needle))
}

/// Items whose status passes `filter`.
pub fn filter_by_status<'a, T, I>(items: I, filter: StatusFilter<T::Status>) -> Vec<&'a T>
where
    T: HasStatus + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter(|item| filter.accepts(&item.status()))
        .collect()
}

/// Policies whose type passes `filter`.
pub fn filter_by_type<'a, I>(policies: I, filter: TypeFilter) -> Vec<&'a Policy>
where
    I: IntoIterator<Item = &'a Policy>,
{
    policies
        .into_iter()
        .filter(|policy| filter.accepts(&policy.policy_type))
        .collect()
}

/// Search term plus filters for the policy list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyQuery {
    /// Free-text search over [`PolicyField::ALL`]
    pub term: String,
    /// Status filter
    pub status: StatusFilter<PolicyStatus>,
    /// Policy type filter
    pub policy_type: TypeFilter,
}

impl PolicyQuery {
    /// Policies passing every part of the query, in collection order.
    #[must_use]
    pub fn apply<'a>(&self, policies: &'a [Policy]) -> Vec<&'a Policy> {
        let filtered = filter_by_type(filter_by_status(policies, self.status), self.policy_type);
        search(filtered, &self.term, &PolicyField::ALL)
    }
}

/// Search term plus filters for the adviser list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdviserQuery {
    /// Free-text search over [`AdviserField::ALL`]
    pub term: String,
    /// Status filter
    pub status: StatusFilter<AdviserStatus>,
    /// Region filter
    pub region: Filter<Region>,
}

impl AdviserQuery {
    /// Advisers passing every part of the query, in collection order.
    #[must_use]
    pub fn apply<'a>(&self, advisers: &'a [Adviser]) -> Vec<&'a Adviser> {
        let filtered: Vec<&Adviser> = filter_by_status(advisers, self.status)
            .into_iter()
            .filter(|adviser| self.region.accepts(&adviser.region))
            .collect();
        search(filtered, &self.term, &AdviserField::ALL)
    }
}
