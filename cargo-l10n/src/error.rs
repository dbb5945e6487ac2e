//! Error types for `cargo-l10n`.

use std::fmt;

use camino::Utf8PathBuf;
use l10n_codegen::{CodegenError, EvalError};
use thiserror::Error;

use crate::source::template::TemplateError;

/// Errors surfaced by the `cargo-l10n` pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum L10nError {
    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// A YAML definition file does not parse.
    #[error("failed to parse YAML {path}: {source}")]
    Yaml {
        /// Offending file.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        #[source]
        source: serde_saphyr::Error,
    },

    /// A JSON definition file does not parse.
    #[error("failed to parse JSON {path}: {source}")]
    Json {
        /// Offending file.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        #[source]
        source: serde_json::Error,
    },

    /// A TOML definition or configuration file does not parse.
    #[error("failed to parse TOML {path}: {source}")]
    Toml {
        /// Offending file.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        #[source]
        source: toml::de::Error,
    },

    /// A definition entry has the wrong shape.
    #[error("{path}: message '{message}': {reason}")]
    Definition {
        /// File holding the entry.
        path: Utf8PathBuf,
        /// Message name.
        message: String,
        /// What is wrong.
        reason: String,
    },

    /// A template string is malformed.
    #[error("{path}: message '{message}': {source}")]
    Template {
        /// File holding the template.
        path: Utf8PathBuf,
        /// Message name.
        message: String,
        /// Parser diagnostic.
        #[source]
        source: TemplateError,
    },

    /// `l10n.toml` holds an invalid value.
    #[error("invalid configuration in {path}: {reason}")]
    Config {
        /// Configuration file.
        path: Utf8PathBuf,
        /// What is wrong.
        reason: String,
    },

    /// The definition file-name pattern is unusable.
    #[error("invalid file name pattern '{pattern}': {reason}")]
    Pattern {
        /// Pattern as given.
        pattern: String,
        /// What is wrong.
        reason: String,
    },

    /// The input directory holds no definition files.
    #[error("no definition files found in {0}")]
    NoDefinitions(Utf8PathBuf),

    /// A `name=value` preview argument is malformed or ill-typed.
    #[error("invalid preview argument '{argument}': {reason}")]
    PreviewArgument {
        /// Raw argument.
        argument: String,
        /// What is wrong.
        reason: String,
    },

    /// Compilation failed.
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    /// Evaluating a preview failed.
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Several independent failures.
    #[error("{0}")]
    Aggregate(AggregatedErrors),
}

impl L10nError {
    /// Collapses a list of errors into `None`, the single error, or an
    /// aggregate. Nested aggregates are flattened.
    #[must_use]
    pub fn try_aggregate(collected: Vec<Self>) -> Option<Self> {
        let mut errors: Vec<Self> = collected.into_iter().flat_map(Self::into_errors).collect();
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Aggregate(AggregatedErrors(errors))),
        }
    }

    /// Splits an aggregate into its members; any other error is returned
    /// alone.
    #[must_use]
    pub fn into_errors(self) -> Vec<Self> {
        match self {
            Self::Aggregate(all) => all.0,
            other => vec![other],
        }
    }

    pub(crate) fn io(at: impl Into<Utf8PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = at.into();
        move |source| Self::Io { path, source }
    }
}

/// Several [`L10nError`]s reported together.
#[derive(Debug)]
pub struct AggregatedErrors(Vec<L10nError>);

impl AggregatedErrors {
    /// Iterates over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &L10nError> {
        self.0.iter()
    }

    /// Number of contained errors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing was aggregated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}
