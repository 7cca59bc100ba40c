// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn record_command(name: &'static str, label: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(json_flags(Command::new("list").about("List all records and their total")))
        .subcommand(
            Command::new("add")
                .about("Record a new entry")
                .arg(Arg::new("label").long(label).required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .required(true)
                        .help("YYYY-MM-DD"),
                )
                .arg(Arg::new("icon").long("icon").help("Glyph shown next to the entry")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete an entry by id")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("download")
                .about("Save the backend's spreadsheet export")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .default_value(".")
                        .help("Directory the file is written to"),
                ),
        )
}

pub fn build_cli() -> Command {
    Command::new("spendwise")
        .version(clap::crate_version!())
        .about("Track income and expenses against a Spendwise backend")
        .arg(
            Arg::new("backend")
                .long("backend")
                .global(true)
                .help("Backend base URL (overrides SPENDWISE_BACKEND_URL)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output on stderr; repeat for more"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Only log errors"),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and cache the session")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account, then log in")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true))
                .arg(
                    Arg::new("avatar")
                        .long("avatar")
                        .help("Profile image to upload after registering"),
                ),
        )
        .subcommand(Command::new("logout").about("End the session and clear the cache"))
        .subcommand(Command::new("whoami").about("Show the cached profile"))
        .subcommand(record_command("income", "source", "Income records"))
        .subcommand(record_command("expense", "category", "Expense records"))
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Totals, monthly income vs expenses, and recent activity")
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize))
                        .default_value("6")
                        .help("Entries in the recent-activity feed"),
                )
                .arg(
                    Arg::new("fill-months")
                        .long("fill-months")
                        .action(ArgAction::SetTrue)
                        .help("Show empty months between the first and last active month"),
                )
                .arg(
                    Arg::new("expense-first")
                        .long("expense-first")
                        .action(ArgAction::SetTrue)
                        .help("List expenses before income when dates tie"),
                )
                .arg(
                    Arg::new("wait-ms")
                        .long("wait-ms")
                        .value_parser(value_parser!(u64))
                        .help("Render with whatever arrived after this many milliseconds"),
                ),
        ))
        .subcommand(
            Command::new("profile")
                .about("Profile display cache and password")
                .subcommand_required(true)
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .about("Edit the locally cached name, email or avatar URL")
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("email").long("email"))
                        .arg(Arg::new("avatar-url").long("avatar-url"))
                        .arg(
                            Arg::new("clear-avatar")
                                .long("clear-avatar")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("avatar-url"),
                        ),
                )
                .subcommand(
                    Command::new("password")
                        .about("Change the account password")
                        .arg(Arg::new("current").long("current").required(true))
                        .arg(Arg::new("new").long("new").required(true))
                        .arg(Arg::new("confirm").long("confirm").required(true)),
                )
                .subcommand(
                    Command::new("avatar")
                        .about("Upload a new profile image")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write fetched records to a local file")
                .subcommand_required(true)
                .subcommand(
                    Command::new("records")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("all")
                                .help("income | expense | all"),
                        )
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv | json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
}
