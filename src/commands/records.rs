// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::models::Record;
use crate::session::AppContext;
use crate::store::TransactionStore;
use crate::utils::{fmt_amount, fmt_day, fmt_usd, maybe_print_json, pretty_table};
use crate::validate::{FormDraft, RecordForm};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Shared handler for `income` and `expense`.
pub fn handle<R: FormDraft>(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list::<R>(ctx, sub)?,
        Some(("add", sub)) => add::<R>(ctx, sub)?,
        Some(("rm", sub)) => remove::<R>(ctx, sub)?,
        Some(("download", sub)) => download::<R>(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn form_from(sub: &clap::ArgMatches) -> RecordForm {
    let text = |name: &str| sub.get_one::<String>(name).cloned().unwrap_or_default();
    RecordForm {
        icon: sub.get_one::<String>("icon").cloned(),
        label: text("label"),
        amount: text("amount"),
        date: text("date"),
    }
}

pub fn record_rows<R: Record>(records: &[R]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            let day = r
                .timestamp()
                .map(|at| fmt_day(&at))
                .unwrap_or_else(|_| r.raw_date().to_string());
            vec![
                r.icon().to_string(),
                r.label().to_string(),
                format!("{}{}", R::KIND.sign(), fmt_amount(r.amount())),
                day,
                r.id().to_string(),
            ]
        })
        .collect()
}

fn print_total<R: Record>(store: &TransactionStore<R>) {
    let title = match R::KIND {
        crate::models::RecordKind::Income => "Total Income",
        crate::models::RecordKind::Expense => "Total Expense",
    };
    println!(
        "{}: {} ({} transactions)",
        title,
        fmt_usd(&store.total()),
        store.len()
    );
}

fn list<R: FormDraft>(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let client = ctx.authed_client()?;
    let mut store = TransactionStore::<R>::new();
    store
        .refresh(&client)
        .with_context(|| format!("Failed to load {}", R::KIND))?;

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &store.records())? {
        return Ok(());
    }
    if store.is_empty() {
        println!("No {} added yet", R::KIND);
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["", R::KIND.label_heading(), "Amount", "Date", "Id"],
            record_rows(store.records()),
        )
    );
    print_total(&store);
    Ok(())
}

/// Loads the current list for the running total. A failed fetch is logged and
/// the mutation proceeds without it.
fn load_for_total<R: FormDraft>(client: &ApiClient) -> Option<TransactionStore<R>> {
    let mut store = TransactionStore::<R>::new();
    match store.refresh(client) {
        Ok(_) => Some(store),
        Err(e) => {
            tracing::warn!(kind = %R::KIND, error = %e, "could not load list; total not shown");
            None
        }
    }
}

fn add<R: FormDraft>(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    // Validation runs before any request is made.
    let draft = R::draft_from(&form_from(sub))?;
    let client = ctx.authed_client()?;

    match load_for_total::<R>(&client) {
        Some(mut store) => {
            let created = store
                .add(&client, &draft)
                .with_context(|| format!("Failed to add {}", R::KIND))?;
            print_added(created);
            print_total(&store);
        }
        None => {
            let created = client
                .add::<R>(&draft)
                .with_context(|| format!("Failed to add {}", R::KIND))?;
            print_added(&created);
        }
    }
    Ok(())
}

fn print_added<R: Record>(created: &R) {
    println!(
        "Added {} '{}' {} (id {})",
        R::KIND,
        created.label(),
        fmt_amount(created.amount()),
        created.id()
    );
}

fn remove<R: FormDraft>(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let client = ctx.authed_client()?;

    match load_for_total::<R>(&client) {
        Some(mut store) => {
            let removed = store
                .delete(&client, id)
                .with_context(|| format!("Failed to delete {} '{}'", R::KIND, id))?;
            println!("Removed {} '{}'", R::KIND, removed.label());
            print_total(&store);
        }
        None => {
            client
                .delete::<R>(id)
                .with_context(|| format!("Failed to delete {} '{}'", R::KIND, id))?;
            println!("Removed {} '{}'", R::KIND, id);
        }
    }
    Ok(())
}

pub fn download_target(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(file_name)
}

fn download<R: FormDraft>(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let dir = PathBuf::from(sub.get_one::<String>("dir").unwrap().trim());
    let client = ctx.authed_client()?;
    let bytes = client
        .download_report(R::KIND)
        .with_context(|| format!("Failed to download {} spreadsheet", R::KIND))?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Create directory {}", dir.display()))?;
    let target = download_target(&dir, R::KIND.download_file_name());
    std::fs::write(&target, &bytes)
        .with_context(|| format!("Write {}", target.display()))?;
    println!("Saved {} ({} bytes)", target.display(), bytes.len());
    Ok(())
}
