//! Report formatting.
//!
//! Turns the structures produced by [`crate::core::metrics`] into plain text. The
//! binary logs this text on start-up; other front ends can render the structures
//! themselves.

use crate::{
    core::metrics::{AdviserPerformance, AdviserRollup, Dashboard},
    errors::Result,
};
use std::fmt::Write;

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80%`
///
/// # Arguments
/// * `percent` - Progress percentage (0-100)
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(percent: u32, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = percent.min(100) as usize;

    let filled = (clamped * length + 50) / 100;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {percent}%")
}

/// Formats a rupee amount with Indian digit grouping, rounded to whole rupees.
///
/// `1250000.0` becomes `₹12,50,000`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹-".to_string();
    }
    // Premiums and sums insured are far below i64::MAX
    #[allow(clippy::cast_possible_truncation)]
    let rupees = amount.round() as i64;
    let digits = rupees.unsigned_abs().to_string();
    let sign = if rupees < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{sign}₹{digits}");
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("{sign}₹{},{last_three}", groups.join(","))
}

/// One line for a ranked adviser: name, policies against target and premium.
#[must_use]
pub fn format_adviser_line(rank: usize, rollup: &AdviserRollup) -> String {
    format!(
        "{rank}. {} - {} policies (Target: {}) | {}",
        rollup.name,
        rollup.policy_count,
        rollup.target,
        format_currency(rollup.premium_sum)
    )
}

/// Text block for the adviser detail view.
pub fn format_adviser_performance(performance: &AdviserPerformance) -> Result<String> {
    let mut text = format!("{} (#{})\n", performance.name, performance.adviser_id);

    writeln!(
        text,
        "  Policies: {} total, {} active, {} this month",
        performance.total_policies, performance.active_policies, performance.policies_this_month
    )?;
    writeln!(
        text,
        "  Premium generated: {}",
        format_currency(performance.premium_generated)
    )?;
    writeln!(
        text,
        "  Target achievement: {}",
        format_progress_bar(performance.target_achievement, None)
    )?;
    for bucket in &performance.monthly {
        writeln!(text, "    {} {}: {}", bucket.label, bucket.year, bucket.count)?;
    }
    Ok(text)
}

/// Formats the whole dashboard into a human-readable summary.
pub fn format_dashboard_summary(dashboard: &Dashboard) -> Result<String> {
    let summary = &dashboard.summary;
    let mut text = format!("Agency Dashboard - {}\n", dashboard.as_of.format("%d %B %Y"));

    writeln!(
        text,
        "  Advisers: {} ({} active, {} new this quarter)",
        summary.total_advisers, summary.active_advisers, summary.new_advisers_this_quarter
    )?;
    writeln!(
        text,
        "  Policies: {} ({} active) | {} this month, {} last month",
        summary.total_policies,
        summary.active_policies,
        summary.policies_this_month,
        summary.policies_last_month
    )?;
    writeln!(text, "  Total premium: {}", format_currency(summary.total_premium))?;
    writeln!(
        text,
        "  Quarterly target {}: {}",
        summary.quarterly_target,
        format_progress_bar(summary.quarterly_progress, None)
    )?;

    if !dashboard.top_advisers.is_empty() {
        writeln!(text, "\nTop advisers")?;
        for (index, rollup) in dashboard.top_advisers.iter().enumerate() {
            writeln!(text, "  {}", format_adviser_line(index + 1, rollup))?;
        }
    }

    if !dashboard.monthly.is_empty() {
        writeln!(text, "\nMonthly performance")?;
        for bucket in &dashboard.monthly {
            writeln!(
                text,
                "  {} {}: {} policies, {}",
                bucket.label,
                bucket.year,
                bucket.count,
                format_currency(bucket.premium_sum)
            )?;
        }
    }

    writeln!(text, "\nRegions")?;
    for region in &dashboard.regions {
        writeln!(
            text,
            "  {}: {} policies, {} | {}",
            region.region,
            region.policy_count,
            format_currency(region.premium_sum),
            format_progress_bar(region.achievement, None)
        )?;
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::MetricsConfig,
        core::{metrics, seed},
        test_utils::*,
    };

    #[test]
    fn test_format_progress_bar_full() {
        assert_eq!(format_progress_bar(100, Some(10)), "[██████████] 100%");
    }

    #[test]
    fn test_format_progress_bar_half() {
        assert_eq!(format_progress_bar(50, Some(10)), "[█████░░░░░] 50%");
    }

    #[test]
    fn test_format_progress_bar_zero() {
        assert_eq!(format_progress_bar(0, Some(10)), "[░░░░░░░░░░] 0%");
    }

    #[test]
    fn test_format_progress_bar_over_hundred_is_clamped_in_bar() {
        assert_eq!(format_progress_bar(130, Some(4)), "[████] 130%");
    }

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(999.0), "₹999");
        assert_eq!(format_currency(3500.0), "₹3,500");
        assert_eq!(format_currency(12000.0), "₹12,000");
        assert_eq!(format_currency(500_000.0), "₹5,00,000");
        assert_eq!(format_currency(1_250_000.0), "₹12,50,000");
        assert_eq!(format_currency(123_456_789.0), "₹12,34,56,789");
    }

    #[test]
    fn test_format_currency_rounding_and_sign() {
        assert_eq!(format_currency(8499.6), "₹8,500");
        assert_eq!(format_currency(-4500.0), "-₹4,500");
        assert_eq!(format_currency(f64::NAN), "₹-");
    }

    #[test]
    fn test_format_adviser_line() {
        let rollup = AdviserRollup {
            adviser_id: 1,
            name: "Rajesh Kumar".to_string(),
            policy_count: 2,
            premium_sum: 27000.0,
            target: 5,
        };
        assert_eq!(
            format_adviser_line(1, &rollup),
            "1. Rajesh Kumar - 2 policies (Target: 5) | ₹27,000"
        );
    }

    #[test]
    fn test_format_dashboard_summary_mentions_every_section() -> Result<()> {
        let advisers = seed::sample_advisers()?;
        let policies = seed::sample_policies()?;
        let dashboard = metrics::build_dashboard(
            &advisers,
            &policies,
            &MetricsConfig::default(),
            date(2024, 2, 15),
        );

        let text = format_dashboard_summary(&dashboard)?;
        assert!(text.starts_with("Agency Dashboard - 15 February 2024"));
        assert!(text.contains("Advisers: 5 (4 active"));
        assert!(text.contains("Total premium: ₹49,000"));
        assert!(text.contains("1. Amit Patel - 1 policies (Target: 5) | ₹25,000"));
        assert!(text.contains("Feb 2024: 2 policies, ₹12,000"));
        assert!(text.contains("Central: 0 policies"));
        Ok(())
    }

    #[test]
    fn test_format_adviser_performance() -> Result<()> {
        let advisers = seed::sample_advisers()?;
        let policies = seed::sample_policies()?;
        let priya = &advisers[1];

        let performance =
            metrics::adviser_performance(priya, &policies, 20, 2, date(2024, 2, 20));
        let text = format_adviser_performance(&performance)?;

        assert!(text.starts_with("Priya Singh (#2)"));
        assert!(text.contains("Policies: 2 total, 1 active, 2 this month"));
        assert!(text.contains("Premium generated: ₹12,000"));
        assert!(text.contains("[█░░░░░░░░░] 10%"));
        Ok(())
    }
}
