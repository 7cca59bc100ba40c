// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{AggregateOptions, DashboardSummary, MonthFill, TieBreak};
use crate::dashboard::{DEFAULT_WAIT, DashboardView};
use crate::session::AppContext;
use crate::utils::{fmt_amount, fmt_day, fmt_usd, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use std::time::Duration;

pub fn options_from(sub: &clap::ArgMatches) -> AggregateOptions {
    AggregateOptions {
        feed_limit: *sub.get_one::<usize>("limit").unwrap_or(&crate::aggregate::DEFAULT_FEED_LIMIT),
        month_fill: if sub.get_flag("fill-months") {
            MonthFill::Span
        } else {
            MonthFill::Omit
        },
        tie_break: if sub.get_flag("expense-first") {
            TieBreak::ExpenseFirst
        } else {
            TieBreak::IncomeFirst
        },
    }
}

pub fn wait_from(sub: &clap::ArgMatches, timeout: Duration) -> Duration {
    match sub.get_one::<u64>("wait-ms") {
        Some(ms) => Duration::from_millis(*ms),
        // One request timeout is enough for both fetches to settle.
        None => timeout.max(Duration::from_secs(1)).min(DEFAULT_WAIT),
    }
}

pub fn handle(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let opts = options_from(sub);
    let client = ctx.authed_client()?;
    let view = DashboardView::load(&client, wait_from(sub, ctx.config().timeout));

    for notice in view.notices() {
        eprintln!("! {}", notice);
    }
    let summary = view
        .summary(&opts)
        .context("Cannot build the dashboard from the fetched records")?;

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    render(&summary);
    Ok(())
}

pub fn stat_rows(summary: &DashboardSummary) -> Vec<Vec<String>> {
    vec![
        vec!["Total Balance".into(), fmt_usd(&summary.balance)],
        vec!["Total Income".into(), fmt_usd(&summary.total_income)],
        vec!["Total Expense".into(), fmt_usd(&summary.total_expense)],
    ]
}

fn render(summary: &DashboardSummary) {
    println!("{}", pretty_table(&["Overview", "Amount"], stat_rows(summary)));

    println!("Income vs Expenses");
    if summary.monthly.is_empty() {
        println!("  (no data)");
    } else {
        let rows = summary
            .monthly
            .iter()
            .map(|p| {
                vec![
                    p.month.to_string(),
                    fmt_usd(&p.income),
                    fmt_usd(&p.expense),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
    }

    println!("Recent Transactions");
    if summary.recent.is_empty() {
        println!("  No transactions yet");
    } else {
        let rows = summary
            .recent
            .iter()
            .map(|e| {
                vec![
                    e.icon.clone(),
                    e.name.clone(),
                    fmt_day(&e.at),
                    format!("{}{}", e.kind.sign(), fmt_amount(&e.amount)),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["", "Name", "Date", "Amount"], rows));
    }
}
