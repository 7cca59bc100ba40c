// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::process::ExitCode;

use spendwise::errors::remote_cause;
use spendwise::models::{ExpenseRecord, IncomeRecord};
use spendwise::{cli, commands, config::Config, logging, session::AppContext};

fn main() -> ExitCode {
    let matches = cli::build_cli().get_matches();
    logging::init(matches.get_count("verbose"), matches.get_flag("quiet"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Backend failures end this action only; nothing is retried.
            if let Some(cause) = remote_cause(&err) {
                tracing::debug!(error = %cause, "backend failure");
                eprintln!("! {:#}", err);
                eprintln!("  The backend could not complete the request; try again later.");
            } else {
                eprintln!("Error: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &clap::ArgMatches) -> Result<()> {

    let config = Config::load(matches.get_one::<String>("backend").map(String::as_str))?;
    tracing::debug!(backend = %config.backend_url, data_dir = %config.data_dir.display(), "configuration loaded");
    let mut ctx = AppContext::load(config)?;

    match matches.subcommand() {
        Some(("login", sub)) => commands::auth::login(&mut ctx, sub)?,
        Some(("register", sub)) => commands::auth::register(&mut ctx, sub)?,
        Some(("logout", _)) => commands::auth::logout(&mut ctx)?,
        Some(("whoami", _)) => commands::auth::whoami(&ctx)?,
        Some(("income", sub)) => commands::records::handle::<IncomeRecord>(&ctx, sub)?,
        Some(("expense", sub)) => commands::records::handle::<ExpenseRecord>(&ctx, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&ctx, sub)?,
        Some(("profile", sub)) => commands::profile::handle(&mut ctx, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ctx, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
