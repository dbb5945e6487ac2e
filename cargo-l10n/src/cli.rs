//! Command-line interface definitions for `cargo-l10n`.

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand};
use l10n_codegen::IntegerWidth;

use crate::config::Overrides;

/// Parsed CLI arguments for `cargo-l10n`.
#[derive(Debug, Parser)]
#[command(name = "cargo-l10n")]
#[command(about = "Compile localisation definition files into typed Rust localizers")]
#[command(version)]
pub struct Cli {
    /// Log pipeline progress at debug level.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile the definitions and write `mod.rs` plus one file per language.
    Generate(GenerateArgs),
    /// Compile the definitions and report errors without writing anything.
    Check(SourceArgs),
    /// Render one message with sample arguments.
    Preview(PreviewArgs),
}

/// Where definitions come from and how to compile them.
#[derive(Debug, Clone, ClapArgs)]
pub struct SourceArgs {
    /// Directory holding the definition files.
    #[arg(long, short, value_name = "dir", default_value = "l10n")]
    pub input: Utf8PathBuf,
    /// Configuration file; defaults to `l10n.toml` in the input directory.
    #[arg(long, value_name = "path")]
    pub config: Option<Utf8PathBuf>,
    /// Name of the generated module.
    #[arg(long, value_name = "name")]
    pub module: Option<String>,
    /// Integer representation for `d` arguments (`i64` or `u64`).
    #[arg(long, value_name = "width")]
    pub integer: Option<IntegerWidth>,
    /// Regular expression a definition file name must match in full; groups
    /// 1, 2 and 3 capture the name, language and extension.
    #[arg(long, short, value_name = "regex")]
    pub pattern: Option<String>,
}

impl SourceArgs {
    /// Flags that override configuration file values.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            module: self.module.clone(),
            integer: self.integer,
            pattern: self.pattern.clone(),
        }
    }
}

/// Arguments for `generate`.
#[derive(Debug, Clone, ClapArgs)]
pub struct GenerateArgs {
    /// Definition source.
    #[command(flatten)]
    pub source: SourceArgs,
    /// Directory receiving the generated files.
    #[arg(long, short, value_name = "dir", default_value = "src/l10n")]
    pub output: Utf8PathBuf,
}

/// Arguments for `preview`.
#[derive(Debug, Clone, ClapArgs)]
pub struct PreviewArgs {
    /// Definition source.
    #[command(flatten)]
    pub source: SourceArgs,
    /// Language to render; defaults to the first registered language.
    #[arg(long, value_name = "lang")]
    pub lang: Option<String>,
    /// Message to render.
    pub message: String,
    /// Arguments as `name=value`.
    #[arg(value_name = "name=value")]
    pub args: Vec<String>,
}
