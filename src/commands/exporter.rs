// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ExpenseRecord, IncomeRecord, Record, RecordKind};
use crate::session::AppContext;
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::path::Path;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("records", sub)) => export_records(ctx, sub),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(anyhow!("Unknown format: {} (use csv|json)", other)),
        }
    }
}

/// Which lists to include.
pub fn kinds_for(s: &str) -> Result<Vec<RecordKind>> {
    match s.trim().to_lowercase().as_str() {
        "income" => Ok(vec![RecordKind::Income]),
        "expense" => Ok(vec![RecordKind::Expense]),
        "all" => Ok(vec![RecordKind::Income, RecordKind::Expense]),
        other => Err(anyhow!("Unknown kind: {} (use income|expense|all)", other)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub kind: RecordKind,
    pub id: String,
    pub icon: String,
    pub label: String,
    pub amount: String,
    pub date: String,
}

pub fn rows_for<R: Record>(records: &[R]) -> Vec<ExportRow> {
    records
        .iter()
        .map(|r| ExportRow {
            kind: R::KIND,
            id: r.id().to_string(),
            icon: r.icon().to_string(),
            label: r.label().to_string(),
            amount: r.amount().to_string(),
            date: r.raw_date().to_string(),
        })
        .collect()
}

pub fn write_rows(rows: &[ExportRow], format: ExportFormat, out: &Path) -> Result<()> {
    match format {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record(["kind", "id", "icon", "label", "amount", "date"])?;
            for r in rows {
                wtr.write_record([
                    r.kind.resource(),
                    r.id.as_str(),
                    r.icon.as_str(),
                    r.label.as_str(),
                    r.amount.as_str(),
                    r.date.as_str(),
                ])?;
            }
            wtr.flush()?;
        }
        ExportFormat::Json => {
            std::fs::write(out, serde_json::to_string_pretty(rows)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
    }
    Ok(())
}

fn export_records(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    // Reject bad arguments before touching the network.
    let format = ExportFormat::parse(sub.get_one::<String>("format").unwrap())?;
    let kinds = kinds_for(sub.get_one::<String>("kind").unwrap())?;
    let out = Path::new(sub.get_one::<String>("out").unwrap().trim());

    let client = ctx.authed_client()?;
    let mut rows = Vec::new();
    for kind in kinds {
        match kind {
            RecordKind::Income => {
                let records = client.list::<IncomeRecord>().context("Failed to load income")?;
                rows.extend(rows_for(&records));
            }
            RecordKind::Expense => {
                let records = client.list::<ExpenseRecord>().context("Failed to load expense")?;
                rows.extend(rows_for(&records));
            }
        }
    }

    write_rows(&rows, format, out)?;
    println!("Exported {} records to {}", rows.len(), out.display());
    Ok(())
}
