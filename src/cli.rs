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
            .help("Print as JSON lines"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn opt(name: &'static str) -> Arg {
    Arg::new(name).long(name)
}

fn req(name: &'static str) -> Arg {
    Arg::new(name).long(name).required(true)
}

fn list_cmd() -> Command {
    json_flags(
        Command::new("list")
            .about("List records")
            .arg(opt("month").help("Only records in this month (YYYY-MM)"))
            .arg(opt("category"))
            .arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize)),
            ),
    )
}

fn dated_record_cmd(name: &'static str, about: &'static str, title: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a new entry")
                .arg(req("amount"))
                .arg(req(title))
                .arg(opt("date").help("YYYY-MM-DD, defaults to today"))
                .arg(opt("category"))
                .arg(opt("notes")),
        )
        .subcommand(list_cmd())
        .subcommand(Command::new("rm").about("Delete an entry").arg(id_arg()))
}

pub fn build_cli() -> Command {
    Command::new("tallywise")
        .about("Personal finance tracker: income, expenses, loans, subscriptions, savings and receipts")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("TALLYWISE_DB")
                .value_name("PATH")
                .help("Database file (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .value_name("ID")
                .help("Act as this user instead of the configured one"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(dated_record_cmd("income", "Income entries", "source"))
        .subcommand(dated_record_cmd("expense", "Expense entries", "name"))
        .subcommand(json_flags(
            Command::new("ledger")
                .about("Income and expenses together, newest first")
                .arg(opt("search").help("Match title or notes, case-insensitive")),
        ))
        .subcommand(
            Command::new("loan")
                .about("Loans and debts")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("initial"))
                        .arg(opt("balance").help("Defaults to the initial amount"))
                        .arg(opt("rate").help("Interest rate in percent"))
                        .arg(opt("payment").help("Monthly payment"))
                        .arg(opt("start").help("YYYY-MM-DD, defaults to today"))
                        .arg(opt("end"))
                        .arg(opt("notes")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("pay")
                        .about("Apply a payment to a loan")
                        .arg(id_arg())
                        .arg(req("amount")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("sub")
                .about("Recurring subscriptions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("amount"))
                        .arg(
                            Arg::new("cycle")
                                .long("cycle")
                                .default_value("Monthly")
                                .help("Weekly, Monthly, Quarterly or Yearly"),
                        )
                        .arg(opt("next").help("Next billing date, YYYY-MM-DD"))
                        .arg(opt("category"))
                        .arg(opt("notes")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("cancel").arg(id_arg()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("savings")
                .about("Savings goals")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("target"))
                        .arg(opt("current").help("Already saved, defaults to 0"))
                        .arg(opt("deadline"))
                        .arg(opt("category"))
                        .arg(opt("notes")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("contribute")
                        .about("Add money to a goal")
                        .arg(id_arg())
                        .arg(req("amount")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("receipt")
                .about("Receipts")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("amount"))
                        .arg(opt("date").help("YYYY-MM-DD, defaults to today"))
                        .arg(opt("merchant"))
                        .arg(opt("category"))
                        .arg(opt("image").help("Image URL or storage key"))
                        .arg(opt("notes")),
                )
                .subcommand(list_cmd())
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("report")
                .about("Derived metrics")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("dashboard")))
                .subcommand(json_flags(
                    Command::new("categories").arg(
                        Arg::new("kind")
                            .long("kind")
                            .default_value("expense")
                            .help("income, expense, subscription, savings or receipt"),
                    ),
                ))
                .subcommand(json_flags(Command::new("subscriptions")))
                .subcommand(json_flags(Command::new("loans")))
                .subcommand(json_flags(Command::new("savings")))
                .subcommand(json_flags(Command::new("receipts")))
                .subcommand(json_flags(Command::new("income-trend"))),
        )
        .subcommand(
            Command::new("import")
                .about("Import a JSON array of rows")
                .arg(Arg::new("kind").required(true))
                .arg(req("path")),
        )
        .subcommand(
            Command::new("export")
                .about("Export records as CSV or JSON")
                .arg(Arg::new("kind").required(true))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv or json"),
                )
                .arg(req("out")),
        )
        .subcommand(
            Command::new("config")
                .about("Active user and display currency")
                .subcommand_required(true)
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set-currency").arg(Arg::new("code").required(true)))
                .subcommand(Command::new("set-user").arg(Arg::new("id").required(true))),
        )
}
