//! `inikit` command-line entry point.
use std::io::Write as _;

use anyhow::Result;
use clap::Parser;

use inikit::logging::{self, Logger};
use inikit::{cli, commands};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = Logger::new();

    let mut stdout = std::io::stdout().lock();
    let result = match &args.command {
        cli::Command::Get(opts) => commands::get::run(&args.global, opts, &log, &mut stdout),
        cli::Command::Set(opts) => commands::set::run(&args.global, opts, &log),
        cli::Command::Remove(opts) => commands::remove::run(&args.global, opts, &log),
        cli::Command::Check(opts) => commands::check::run(&args.global, opts, &log),
        cli::Command::Fmt(opts) => commands::fmt::run(&args.global, opts, &log),
        cli::Command::Dump(opts) => commands::dump::run(&args.global, opts, &log, &mut stdout),
        cli::Command::Version => commands::version::run(&mut stdout),
    };
    stdout.flush()?;
    if let Some(summary) = log.summary() {
        log.info(&format!("finished with {summary}"));
    }
    result
}
