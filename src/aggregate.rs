// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Totals, month buckets and the recent-activity feed derived from the
//! income and expense lists. Everything here is pure; the only side effect
//! is a `tracing` warning when an amount cannot be read.

use crate::errors::TrackerResult;
use crate::models::{Amount, ExpenseRecord, IncomeRecord, Record, RecordKind};
use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_FEED_LIMIT: usize = 6;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How months without any record show up in the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFill {
    /// Only months that have at least one record.
    #[default]
    Omit,
    /// Zero-filled buckets between the first and last populated month.
    Span,
}

/// Which list wins when two feed entries share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    #[default]
    IncomeFirst,
    ExpenseFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub feed_limit: usize,
    pub month_fill: MonthFill,
    pub tie_break: TieBreak,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            feed_limit: DEFAULT_FEED_LIMIT,
            month_fill: MonthFill::default(),
            tie_break: TieBreak::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub month: &'static str,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    pub id: String,
    pub kind: RecordKind,
    pub name: String,
    pub icon: String,
    pub amount: Amount,
    pub at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub monthly: Vec<MonthlyPoint>,
    pub recent: Vec<FeedEntry>,
}

fn amount_or_zero<R: Record>(record: &R) -> Decimal {
    match record.amount() {
        Amount::Value(d) => *d,
        Amount::Unparsable(raw) => {
            tracing::warn!(
                kind = %R::KIND,
                id = record.id(),
                amount = raw.as_str(),
                "non-numeric amount counted as 0"
            );
            Decimal::ZERO
        }
    }
}

/// Sum that clamps to `Decimal::MAX`/`MIN` instead of panicking.
fn saturating_add(acc: Decimal, x: Decimal) -> Decimal {
    acc.checked_add(x).unwrap_or_else(|| {
        tracing::warn!(%acc, %x, "total out of range; clamped");
        if x.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

fn saturating_sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| {
        tracing::warn!(%a, %b, "balance out of range; clamped");
        if b.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

pub fn compute_total<R: Record>(records: &[R]) -> Decimal {
    records
        .iter()
        .map(amount_or_zero)
        .fold(Decimal::ZERO, saturating_add)
}

pub fn balance(income: &[IncomeRecord], expense: &[ExpenseRecord]) -> Decimal {
    saturating_sub(compute_total(income), compute_total(expense))
}

/// Buckets records by month name only; the same month of different years
/// lands in one bucket. Output follows calendar order.
pub fn build_monthly_series(
    income: &[IncomeRecord],
    expense: &[ExpenseRecord],
    fill: MonthFill,
) -> TrackerResult<Vec<MonthlyPoint>> {
    let mut buckets: BTreeMap<u32, (Decimal, Decimal)> = BTreeMap::new();

    for rec in income {
        let m = rec.timestamp()?.month0();
        let slot = buckets.entry(m).or_insert((Decimal::ZERO, Decimal::ZERO));
        slot.0 = saturating_add(slot.0, amount_or_zero(rec));
    }
    for rec in expense {
        let m = rec.timestamp()?.month0();
        let slot = buckets.entry(m).or_insert((Decimal::ZERO, Decimal::ZERO));
        slot.1 = saturating_add(slot.1, amount_or_zero(rec));
    }

    if fill == MonthFill::Span {
        if let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) {
            for m in first..=last {
                buckets.entry(m).or_insert((Decimal::ZERO, Decimal::ZERO));
            }
        }
    }

    Ok(buckets
        .into_iter()
        .map(|(m, (inc, exp))| MonthlyPoint {
            month: MONTH_LABELS[m as usize],
            income: inc,
            expense: exp,
        })
        .collect())
}

fn feed_entries<R: Record>(records: &[R]) -> TrackerResult<Vec<FeedEntry>> {
    records
        .iter()
        .map(|r| {
            Ok(FeedEntry {
                id: r.id().to_string(),
                kind: R::KIND,
                name: r.label().to_string(),
                icon: r.icon().to_string(),
                amount: r.amount().clone(),
                at: r.timestamp()?,
            })
        })
        .collect()
}

/// Newest first, at most `limit` entries. `sort_by` is stable, so entries
/// with equal timestamps keep the concatenation order picked by `tie_break`.
pub fn build_recent_feed(
    income: &[IncomeRecord],
    expense: &[ExpenseRecord],
    limit: usize,
    tie_break: TieBreak,
) -> TrackerResult<Vec<FeedEntry>> {
    let incomes = feed_entries(income)?;
    let expenses = feed_entries(expense)?;

    let mut all = match tie_break {
        TieBreak::IncomeFirst => [incomes, expenses].concat(),
        TieBreak::ExpenseFirst => [expenses, incomes].concat(),
    };
    all.sort_by(|a, b| b.at.cmp(&a.at));
    all.truncate(limit);
    Ok(all)
}

pub fn summarize(
    income: &[IncomeRecord],
    expense: &[ExpenseRecord],
    opts: &AggregateOptions,
) -> TrackerResult<DashboardSummary> {
    let total_income = compute_total(income);
    let total_expense = compute_total(expense);
    Ok(DashboardSummary {
        total_income,
        total_expense,
        balance: saturating_sub(total_income, total_expense),
        monthly: build_monthly_series(income, expense, opts.month_fill)?,
        recent: build_recent_feed(income, expense, opts.feed_limit, opts.tie_break)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inc(id: &str, amount: i64, date: &str) -> IncomeRecord {
        IncomeRecord {
            id: id.into(),
            icon: "💰".into(),
            source: format!("src-{}", id),
            amount: Amount::Value(Decimal::from(amount)),
            date: date.into(),
        }
    }

    #[test]
    fn span_fill_covers_gaps_only_between_populated_months() {
        let income = vec![inc("a", 10, "2024-02-01"), inc("b", 20, "2024-05-01")];
        let series = build_monthly_series(&income, &[], MonthFill::Span).unwrap();
        let months: Vec<_> = series.iter().map(|p| p.month).collect();
        assert_eq!(months, vec!["Feb", "Mar", "Apr", "May"]);
        assert_eq!(series[1].income, Decimal::ZERO);
    }

    #[test]
    fn same_month_of_different_years_shares_a_bucket() {
        let income = vec![inc("a", 10, "2023-03-01"), inc("b", 5, "2024-03-20")];
        let series = build_monthly_series(&income, &[], MonthFill::Omit).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].income, Decimal::from(15));
    }
}
