//! CLI entrypoint for `cargo-l10n`.

use std::ffi::OsString;
use std::fmt::Display;
use std::io::{self, Write};
use std::process::ExitCode;

use cargo_l10n::cli::Cli;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse_from(cargo_args(std::env::args_os()));
    init_tracing(cli.verbose);
    match cargo_l10n::run(&cli.command) {
        Ok(outcome) => emit(io::stdout().lock(), &outcome, ExitCode::SUCCESS),
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            emit(io::stderr().lock(), &format!("error: {err}"), ExitCode::FAILURE)
        }
    }
}

/// Drops the subcommand name cargo passes when run as `cargo l10n`.
fn cargo_args(args: impl Iterator<Item = OsString>) -> Vec<OsString> {
    let mut collected: Vec<OsString> = args.collect();
    if collected.get(1).is_some_and(|arg| arg == "l10n") {
        collected.remove(1);
    }
    collected
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn emit(mut out: impl Write, text: &dyn Display, code: ExitCode) -> ExitCode {
    match writeln!(out, "{text}") {
        Ok(()) => code,
        Err(_) => ExitCode::FAILURE,
    }
}
