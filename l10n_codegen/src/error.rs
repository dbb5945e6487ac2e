//! Error types produced by validation, lowering, unification and emission.

use std::fmt;

use thiserror::Error;

/// Where in the definition tree a schema error was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Language code of the offending localisation.
    pub language: String,
    /// Message name, when the error is scoped to a message.
    pub message: Option<String>,
    /// Variable name, when the error is scoped to a variable.
    pub variable: Option<String>,
}

impl Location {
    /// Location covering a whole localisation.
    #[must_use]
    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            message: None,
            variable: None,
        }
    }

    /// Narrows the location to a message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Narrows the location to a variable of the current message.
    #[must_use]
    pub fn variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "language '{}'", self.language)?;
        if let Some(message) = &self.message {
            write!(f, ", message '{message}'")?;
        }
        if let Some(variable) = &self.variable {
            write!(f, ", variable '{variable}'")?;
        }
        Ok(())
    }
}

/// Kinds of schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaErrorKind {
    /// A template references an argument that is not declared.
    #[error("argument '{0}' is not declared")]
    UnknownArgument(String),

    /// A template references a variable that is not declared.
    #[error("variable '{0}' is not declared")]
    UnknownVariable(String),

    /// Two arguments share a name.
    #[error("argument '{0}' is declared more than once")]
    DuplicateArgument(String),

    /// Two messages share a name.
    #[error("message '{0}' is declared more than once")]
    DuplicateMessage(String),

    /// Two variables share a name.
    #[error("variable '{0}' is declared more than once")]
    DuplicateVariable(String),

    /// The same language was supplied twice.
    #[error("language is supplied more than once")]
    DuplicateLanguage,

    /// Neither a plain nor a plural template is present.
    #[error("no template; expected a plain or a plural template")]
    UnsetTemplate,

    /// Both a plain and a plural template are present.
    #[error("plain and plural templates are mutually exclusive")]
    ConflictingTemplates,

    /// A plural has no branches.
    #[error("plural template has no branches")]
    EmptyPlural,

    /// A plural is driven by a non-integer argument.
    #[error("plural argument '{name}' must be an integer, found {found}")]
    PluralArgumentNotInteger {
        /// Driving argument name.
        name: String,
        /// Declared type.
        found: String,
    },

    /// The explicit branches leave part of the driving domain unmatched.
    #[error("plural on '{0}' needs an 'other' branch to cover every value")]
    MissingOtherBranch(String),

    /// A variable receives an argument the message does not declare.
    #[error("variable argument '{0}' is not declared by the message")]
    VariableArgumentNotInMessage(String),

    /// A variable body uses an argument it does not receive.
    #[error("argument '{0}' is not passed to this variable")]
    ArgumentNotInVariable(String),

    /// Variables reference each other in a loop.
    #[error("variable references form a cycle: {0}")]
    VariableCycle(String),

    /// A name cannot become a Rust identifier.
    #[error("'{0}' is not a valid identifier")]
    InvalidIdentifier(String),

    /// A format directive is malformed or unsupported for the argument type.
    #[error("invalid format directive '{directive}': {reason}")]
    InvalidDirective {
        /// Raw directive.
        directive: String,
        /// Why the directive was rejected.
        reason: String,
    },

    /// A name collides with an item the generated code defines itself.
    #[error("'{0}' is reserved by the generated code")]
    ReservedName(String),

    /// A user type path does not parse.
    #[error("'{0}' is not a valid type path")]
    InvalidTypePath(String),

    /// The reference language declares a message this language lacks.
    #[error("message is declared by the reference language '{0}' but missing here")]
    MissingMessage(String),

    /// This language declares a message the reference language lacks.
    #[error("message is not declared by the reference language '{0}'")]
    UnexpectedMessage(String),

    /// Argument lists differ from the reference language.
    #[error("signature ({found}) differs from the reference ({expected})")]
    SignatureMismatch {
        /// Reference signature.
        expected: String,
        /// Signature found in this language.
        found: String,
    },
}

/// A fatal schema violation with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {kind}")]
pub struct SchemaError {
    /// Where the violation was found.
    pub location: Location,
    /// What went wrong.
    pub kind: SchemaErrorKind,
}

impl SchemaError {
    /// Pairs a location with a violation.
    #[must_use]
    pub const fn new(location: Location, kind: SchemaErrorKind) -> Self {
        Self { location, kind }
    }
}

/// Errors surfaced by the compilation pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodegenError {
    /// The definitions violate the schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// There was nothing to compile.
    #[error("no localizations were supplied")]
    NoLocalizations,

    /// Generated tokens did not form a valid Rust file.
    #[error("generated code for '{unit}' is not valid Rust: {source}")]
    Render {
        /// Name of the generated unit.
        unit: String,
        /// Parser diagnostic.
        #[source]
        source: syn::Error,
    },

    /// Several independent failures.
    #[error("{count} compilation errors:\n{0}", count = .0.len())]
    Aggregate(Box<AggregatedErrors>),
}

impl CodegenError {
    /// Collapses a list of errors: `None` for none, the error itself for one,
    /// and [`CodegenError::Aggregate`] otherwise.
    #[must_use]
    pub fn try_aggregate(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Aggregate(Box::new(AggregatedErrors(errors)))),
        }
    }

    /// Iterates over the schema errors contained in this error.
    #[must_use]
    pub fn schema_errors(&self) -> Vec<&SchemaError> {
        match self {
            Self::Schema(err) => vec![err],
            Self::Aggregate(all) => all.iter().flat_map(Self::schema_errors).collect(),
            Self::NoLocalizations | Self::Render { .. } => Vec::new(),
        }
    }
}

/// Collection of [`CodegenError`]s from a single compilation.
#[derive(Debug, Default)]
pub struct AggregatedErrors(Vec<CodegenError>);

impl AggregatedErrors {
    /// Iterates over the contained errors.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &CodegenError> {
        self.0.iter()
    }

    /// Number of errors in the aggregation.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the aggregation is empty.
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
            write!(f, "{}: {e}", i + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregatedErrors {}

/// Convenience alias for pipeline results.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Collects schema errors into a single result.
pub(crate) fn collect(errors: Vec<SchemaError>) -> CodegenResult<()> {
    CodegenError::try_aggregate(errors.into_iter().map(CodegenError::from).collect())
        .map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn location_display_narrows() {
        let location = Location::language("en").message("items").variable("total");
        assert_eq!(
            location.to_string(),
            "language 'en', message 'items', variable 'total'"
        );
    }

    #[rstest]
    fn try_aggregate_unwraps_single_error() {
        let err = CodegenError::try_aggregate(vec![CodegenError::NoLocalizations]);
        assert!(matches!(err, Some(CodegenError::NoLocalizations)));
        assert!(CodegenError::try_aggregate(Vec::new()).is_none());
    }

    #[rstest]
    fn aggregate_lists_every_error() {
        let schema = |name: &str| {
            CodegenError::from(SchemaError::new(
                Location::language("en").message(name),
                SchemaErrorKind::UnsetTemplate,
            ))
        };
        let err = CodegenError::try_aggregate(vec![schema("a"), schema("b")]);
        let Some(err) = err else {
            panic!("expected an aggregate");
        };
        assert_eq!(err.schema_errors().len(), 2);
        let rendered = err.to_string();
        assert!(rendered.starts_with("2 compilation errors:"), "{rendered}");
        assert!(rendered.contains("1: language 'en', message 'a'"), "{rendered}");
    }
}
