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
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn yes_flag(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("yes")
            .long("yes")
            .short('y')
            .action(ArgAction::SetTrue)
            .help("Skip the confirmation prompt"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month").long("month").help("YYYY-MM")
}

pub fn build_cli() -> Command {
    Command::new("smartledger")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Screenshot-driven expense ledger with duplicate merging, monthly budgets, and JSON backups")
        .subcommand(Command::new("init").about("Create the ledger database"))
        .subcommand(
            Command::new("analyze")
                .about("Extract transactions from payment screenshots")
                .arg(
                    Arg::new("image")
                        .long("image")
                        .short('i')
                        .required(true)
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .help("Screenshot file (repeatable)"),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Replace fields of one transaction")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("time").long("time"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("merchant").long("merchant"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("platform").long("platform"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("object").long("object"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(yes_flag(
                    Command::new("rm")
                        .about("Delete one transaction")
                        .arg(Arg::new("id").required(true)),
                ))
                .subcommand(yes_flag(
                    Command::new("clear").about("Delete every transaction"),
                )),
        )
        .subcommand(yes_flag(
            Command::new("dedup").about("Merge duplicates captured on two payment rails"),
        ))
        .subcommand(
            Command::new("budget")
                .about("Monthly category budgets")
                .subcommand(
                    Command::new("set")
                        .about("Replace all budgets, e.g. `budget set food=1500 transport=300`")
                        .arg(
                            Arg::new("limits")
                                .required(true)
                                .num_args(1..)
                                .help("CATEGORY=LIMIT pairs; a limit of 0 removes the budget"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(
                    Command::new("status").about("This month's spend against each budget"),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Spending summaries")
                .subcommand(json_flags(
                    Command::new("categories").arg(month_arg()),
                ))
                .subcommand(json_flags(Command::new("daily").arg(month_arg()))),
        )
        .subcommand(
            Command::new("export")
                .about("Write a full backup (transactions and budgets)")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .default_value(".")
                        .help("Directory for smartledger_backup_YYYY-MM-DD.json"),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Load a backup or a legacy transaction array")
                .arg(Arg::new("path").long("path").required(true))
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .value_parser(["overwrite", "append"])
                        .help("Skip the prompt; without it you are asked whether to overwrite"),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}
