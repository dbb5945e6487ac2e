//! Library interface for the `cargo-l10n` subcommand.
//!
//! The crate discovers definition files by name pattern, builds the
//! compiler IR from them and drives [`l10n_codegen`] to check definitions,
//! write generated localizers or preview single messages.

pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod fs_helpers;
pub mod output;
pub mod preview;
pub mod source;

use std::fmt;

use camino::Utf8PathBuf;
use l10n_codegen::ir::Localization;
use l10n_codegen::{Compiled, Compiler};

use crate::cli::{Command, SourceArgs};
use crate::config::ProjectConfig;
use crate::discover::FileNamePattern;
use crate::error::L10nError;

/// Loads configuration and every localisation under `args.input`.
///
/// # Errors
///
/// Returns configuration, pattern and discovery errors immediately; read,
/// parse and definition errors of every language are aggregated.
pub fn load(args: &SourceArgs) -> Result<(ProjectConfig, Vec<Localization>), L10nError> {
    let config = ProjectConfig::load(&args.input, args.config.as_deref(), &args.overrides())?;
    let pattern = FileNamePattern::new(&config.pattern)?;
    let languages = discover::discover(&args.input, &pattern)?;
    let mut localizations = Vec::with_capacity(languages.len());
    let mut errors = Vec::new();
    for language in &languages {
        let built = discover::read_documents(&args.input, language).and_then(|documents| {
            source::build_localization(&language.language, &documents, &config.specifiers)
        });
        match built {
            Ok(localization) => localizations.push(localization),
            Err(err) => errors.push(err),
        }
    }
    L10nError::try_aggregate(errors).map_or(Ok((config, localizations)), Err)
}

/// Loads and compiles the definitions under `args.input`.
///
/// # Errors
///
/// Returns the errors of [`load`] and every compilation error.
pub fn compile(args: &SourceArgs) -> Result<Compiled, L10nError> {
    let (config, localizations) = load(args)?;
    Ok(Compiler::new(config.codegen).compile(&localizations)?)
}

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Paths of the written files.
    Generated(Vec<Utf8PathBuf>),
    /// Definitions compiled cleanly.
    Checked {
        /// Number of languages.
        languages: usize,
        /// Number of messages per language.
        messages: usize,
    },
    /// Rendered message text.
    Preview(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generated(paths) => {
                for (i, path) in paths.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "wrote {path}")?;
                }
                Ok(())
            }
            Self::Checked {
                languages,
                messages,
            } => write!(f, "ok: {languages} languages, {messages} messages"),
            Self::Preview(text) => f.write_str(text),
        }
    }
}

/// Runs one subcommand.
///
/// # Errors
///
/// Returns any loading, compilation, output or preview error.
pub fn run(command: &Command) -> Result<Outcome, L10nError> {
    match command {
        Command::Generate(args) => {
            let files = compile(&args.source)?.render()?;
            Ok(Outcome::Generated(output::write_files(&args.output, &files)?))
        }
        Command::Check(args) => {
            let compiled = compile(args)?;
            let messages = compiled
                .units()
                .first()
                .map_or(0, |unit| unit.messages.len());
            Ok(Outcome::Checked {
                languages: compiled.units().len(),
                messages,
            })
        }
        Command::Preview(args) => {
            let compiled = compile(&args.source)?;
            let text = preview::preview(&compiled, args.lang.as_deref(), &args.message, &args.args)?;
            Ok(Outcome::Preview(text))
        }
    }
}
