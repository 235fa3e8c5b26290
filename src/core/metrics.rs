//! Derived metrics - Read-side computations behind the dashboards.
//!
//! Every function here is pure: it takes slices borrowed from a store snapshot and a
//! reference date, and never mutates anything. Percentages are whole numbers clamped
//! to `0..=100`; a zero denominator yields `0`.
//!
//! Targets use exact integer arithmetic, so "ceil(count × 1.3)" is 13 for ten
//! policies rather than whatever the float product rounds up to.

use crate::{
    config::MetricsConfig,
    models::{Adviser, Policy, Region},
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Policy count at which an adviser reaches 100% achievement.
pub const DEFAULT_ADVISER_CAPACITY: u32 = 20;
/// Lowest per-adviser target.
pub const MIN_ADVISER_TARGET: u32 = 5;
/// Lowest quarterly target.
pub const MIN_QUARTERLY_TARGET: u32 = 10;
/// Length of the trailing window used for "this quarter" figures, in months.
pub const QUARTER_MONTHS: u32 = 3;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Policies started in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    /// Short month name (e.g. "Jan")
    pub label: &'static str,
    /// Number of policies started in the month
    pub count: usize,
    /// Sum of their premiums
    pub premium_sum: f64,
}

/// Policies started in one calendar quarter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterlyBucket {
    /// Calendar year
    pub year: i32,
    /// Quarter number, 1-4
    pub quarter: u32,
    /// Number of policies started in the quarter
    pub count: usize,
    /// Sum of their premiums
    pub premium_sum: f64,
    /// Target for the quarter, grown from the previous quarter's count
    pub target: u32,
}

impl QuarterlyBucket {
    /// Label as shown on the dashboard (e.g. "Q1").
    #[must_use]
    pub fn label(&self) -> String {
        format!("Q{}", self.quarter)
    }
}

/// One adviser's totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviserRollup {
    /// Adviser id
    pub adviser_id: i64,
    /// Adviser name
    pub name: String,
    /// Number of policies owned
    pub policy_count: usize,
    /// Sum of their premiums
    pub premium_sum: f64,
    /// Policy target, `max(5, ceil(policy_count × 1.3))`
    pub target: u32,
}

/// One region's totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionPerformance {
    /// The region
    pub region: Region,
    /// Policies owned by advisers in the region
    pub policy_count: usize,
    /// Sum of their premiums
    pub premium_sum: f64,
    /// Active advisers in the region
    pub active_advisers: usize,
    /// Policies against `capacity × active advisers`, percent
    pub achievement: u32,
}

/// Detail figures for a single adviser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviserPerformance {
    /// Adviser id
    pub adviser_id: i64,
    /// Adviser name
    pub name: String,
    /// All policies owned
    pub total_policies: usize,
    /// Owned policies currently in force
    pub active_policies: usize,
    /// Owned policies started in the reference month
    pub policies_this_month: usize,
    /// Sum of premiums over all owned policies
    pub premium_generated: f64,
    /// Target achievement against the configured capacity, percent
    pub target_achievement: u32,
    /// The adviser's own monthly series, oldest first
    pub monthly: Vec<MonthlyBucket>,
}

/// Headline figures for the main dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// All advisers
    pub total_advisers: usize,
    /// Advisers with active status
    pub active_advisers: usize,
    /// Advisers who joined in the trailing quarter
    pub new_advisers_this_quarter: usize,
    /// All policies
    pub total_policies: usize,
    /// Policies in force
    pub active_policies: usize,
    /// Policies started in the reference month
    pub policies_this_month: usize,
    /// Policies started in the month before
    pub policies_last_month: usize,
    /// Sum of all premiums
    pub total_premium: f64,
    /// Quarterly policy target
    pub quarterly_target: u32,
    /// Active policies against the quarterly target, percent
    pub quarterly_progress: u32,
}

/// Everything the dashboard page shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Reference date
    pub as_of: NaiveDate,
    /// Headline figures
    pub summary: DashboardSummary,
    /// Best advisers by premium
    pub top_advisers: Vec<AdviserRollup>,
    /// Trailing monthly series
    pub monthly: Vec<MonthlyBucket>,
    /// Per-region totals
    pub regions: Vec<RegionPerformance>,
}

/// Months since year 0, so month arithmetic never needs a fallible date constructor.
fn month_index(date: NaiveDate) -> i32 {
    // month0() is always below 12
    #[allow(clippy::cast_possible_wrap)]
    let month0 = date.month0() as i32;
    date.year() * 12 + month0
}

/// Inverse of [`month_index`]: `(year, month 1-12)`.
fn split_month_index(index: i32) -> (i32, u32) {
    // rem_euclid(12) is always in 0..12
    #[allow(clippy::cast_sign_loss)]
    let month = index.rem_euclid(12) as u32 + 1;
    (index.div_euclid(12), month)
}

fn month_label(month: u32) -> &'static str {
    MONTH_LABELS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// True when `date` falls in the trailing `months` calendar months ending at
/// `as_of`'s month.
fn within_trailing_months(date: NaiveDate, as_of: NaiveDate, months: u32) -> bool {
    let current = month_index(as_of);
    let index = month_index(date);
    let span = i32::try_from(months).unwrap_or(i32::MAX);
    index <= current && index > current.saturating_sub(span)
}

/// `ceil(count × numerator / 10)` without floating point.
fn grown(count: usize, tenths: usize) -> u32 {
    let value = count.saturating_mul(tenths).div_ceil(10);
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// `min(round(numerator / denominator × 100), 100)`, or `0` for a zero denominator.
#[must_use]
pub fn percentage(numerator: usize, denominator: usize) -> u32 {
    if denominator == 0 {
        return 0;
    }
    // round-half-up of numerator * 100 / denominator
    let scaled = numerator
        .saturating_mul(200)
        .saturating_add(denominator)
        / denominator.saturating_mul(2);
    u32::try_from(scaled.min(100)).unwrap_or(100)
}

fn premium_sum<'a>(policies: impl IntoIterator<Item = &'a Policy>) -> f64 {
    policies.into_iter().map(|p| p.premium).sum()
}

/// Buckets policies by the month of their start date, covering the trailing
/// `months_back` months ending at `as_of`'s month, oldest first.
#[must_use]
pub fn monthly_policy_counts(
    policies: &[Policy],
    months_back: u32,
    as_of: NaiveDate,
) -> Vec<MonthlyBucket> {
    let current = month_index(as_of);
    (0..months_back)
        .rev()
        .map(|back| {
            let index = current - i32::try_from(back).unwrap_or(i32::MAX);
            let (year, month) = split_month_index(index);
            let in_month: Vec<&Policy> = policies
                .iter()
                .filter(|p| month_index(p.start_date) == index)
                .collect();
            MonthlyBucket {
                year,
                month,
                label: month_label(month),
                count: in_month.len(),
                premium_sum: premium_sum(in_month),
            }
        })
        .collect()
}

/// Per-adviser policy target: `max(5, ceil(policy_count × 1.3))`.
#[must_use]
pub fn adviser_target(policy_count: usize) -> u32 {
    grown(policy_count, 13).max(MIN_ADVISER_TARGET)
}

/// Totals for every adviser, in adviser order.
#[must_use]
pub fn adviser_rollups(advisers: &[Adviser], policies: &[Policy]) -> Vec<AdviserRollup> {
    advisers
        .iter()
        .map(|adviser| {
            let owned: Vec<&Policy> = policies
                .iter()
                .filter(|p| p.adviser_id == adviser.id)
                .collect();
            AdviserRollup {
                adviser_id: adviser.id,
                name: adviser.name.clone(),
                policy_count: owned.len(),
                premium_sum: premium_sum(owned.iter().copied()),
                target: adviser_target(owned.len()),
            }
        })
        .collect()
}

/// The `n` advisers with the highest premium sum, highest first. Ties keep adviser
/// order.
#[must_use]
pub fn top_advisers(advisers: &[Adviser], policies: &[Policy], n: usize) -> Vec<AdviserRollup> {
    let mut rollups = adviser_rollups(advisers, policies);
    // sort_by is stable
    rollups.sort_by(|a, b| b.premium_sum.total_cmp(&a.premium_sum));
    rollups.truncate(n);
    rollups
}

/// `min(round(policy_count / assumed_capacity × 100), 100)`; `0` when capacity is `0`.
#[must_use]
pub fn adviser_target_achievement(policy_count: usize, assumed_capacity: u32) -> u32 {
    percentage(policy_count, assumed_capacity as usize)
}

/// `max(10, ceil(policies started in the trailing quarter × 1.2))`.
#[must_use]
pub fn quarterly_target(policies: &[Policy], as_of: NaiveDate) -> u32 {
    let recent = policies
        .iter()
        .filter(|p| within_trailing_months(p.start_date, as_of, QUARTER_MONTHS))
        .count();
    grown(recent, 12).max(MIN_QUARTERLY_TARGET)
}

/// Active policies against [`quarterly_target`], percent.
#[must_use]
pub fn quarterly_progress(policies: &[Policy], as_of: NaiveDate) -> u32 {
    let active = policies.iter().filter(|p| p.is_active()).count();
    percentage(active, quarterly_target(policies, as_of) as usize)
}

/// Q1-Q4 of `year`. Each quarter's target grows the previous quarter's count by 20%,
/// with a floor of 10.
#[must_use]
pub fn quarterly_policy_counts(policies: &[Policy], year: i32) -> Vec<QuarterlyBucket> {
    let in_quarter = |y: i32, quarter: u32| {
        policies
            .iter()
            .filter(|p| p.start_date.year() == y && p.start_date.month0() / 3 + 1 == quarter)
            .collect::<Vec<&Policy>>()
    };

    let mut previous_count = in_quarter(year - 1, 4).len();
    (1..=4)
        .map(|quarter| {
            let current = in_quarter(year, quarter);
            let bucket = QuarterlyBucket {
                year,
                quarter,
                count: current.len(),
                premium_sum: premium_sum(current.iter().copied()),
                target: grown(previous_count, 12).max(MIN_QUARTERLY_TARGET),
            };
            previous_count = current.len();
            bucket
        })
        .collect()
}

/// Totals per region, in [`Region::ALL`] order. Policies whose adviser no longer
/// exists are not attributed to any region.
#[must_use]
pub fn region_breakdown(
    advisers: &[Adviser],
    policies: &[Policy],
    assumed_capacity: u32,
) -> Vec<RegionPerformance> {
    Region::ALL
        .into_iter()
        .map(|region| {
            let in_region: Vec<&Adviser> =
                advisers.iter().filter(|a| a.region == region).collect();
            let owned: Vec<&Policy> = policies
                .iter()
                .filter(|p| in_region.iter().any(|a| a.id == p.adviser_id))
                .collect();
            let active_advisers = in_region.iter().filter(|a| a.is_active()).count();
            let capacity = (assumed_capacity as usize).saturating_mul(active_advisers);
            RegionPerformance {
                region,
                policy_count: owned.len(),
                premium_sum: premium_sum(owned.iter().copied()),
                active_advisers,
                achievement: percentage(owned.len(), capacity),
            }
        })
        .collect()
}

/// Detail figures for `adviser`.
#[must_use]
pub fn adviser_performance(
    adviser: &Adviser,
    policies: &[Policy],
    assumed_capacity: u32,
    months_back: u32,
    as_of: NaiveDate,
) -> AdviserPerformance {
    let owned: Vec<Policy> = policies
        .iter()
        .filter(|p| p.adviser_id == adviser.id)
        .cloned()
        .collect();
    let current = month_index(as_of);

    AdviserPerformance {
        adviser_id: adviser.id,
        name: adviser.name.clone(),
        total_policies: owned.len(),
        active_policies: owned.iter().filter(|p| p.is_active()).count(),
        policies_this_month: owned
            .iter()
            .filter(|p| month_index(p.start_date) == current)
            .count(),
        premium_generated: premium_sum(&owned),
        target_achievement: adviser_target_achievement(owned.len(), assumed_capacity),
        monthly: monthly_policy_counts(&owned, months_back, as_of),
    }
}

/// Headline figures as of `as_of`.
#[must_use]
pub fn dashboard_summary(
    advisers: &[Adviser],
    policies: &[Policy],
    as_of: NaiveDate,
) -> DashboardSummary {
    let current = month_index(as_of);
    let started_in = |index: i32| {
        policies
            .iter()
            .filter(|p| month_index(p.start_date) == index)
            .count()
    };

    DashboardSummary {
        total_advisers: advisers.len(),
        active_advisers: advisers.iter().filter(|a| a.is_active()).count(),
        new_advisers_this_quarter: advisers
            .iter()
            .filter(|a| within_trailing_months(a.joining_date, as_of, QUARTER_MONTHS))
            .count(),
        total_policies: policies.len(),
        active_policies: policies.iter().filter(|p| p.is_active()).count(),
        policies_this_month: started_in(current),
        policies_last_month: started_in(current - 1),
        total_premium: premium_sum(policies),
        quarterly_target: quarterly_target(policies, as_of),
        quarterly_progress: quarterly_progress(policies, as_of),
    }
}

/// Builds the full dashboard using the configured metric parameters.
#[must_use]
pub fn build_dashboard(
    advisers: &[Adviser],
    policies: &[Policy],
    config: &MetricsConfig,
    as_of: NaiveDate,
) -> Dashboard {
    Dashboard {
        as_of,
        summary: dashboard_summary(advisers, policies, as_of),
        top_advisers: top_advisers(advisers, policies, config.top_advisers),
        monthly: monthly_policy_counts(policies, config.months_back, as_of),
        regions: region_breakdown(advisers, policies, config.adviser_capacity),
    }
}
