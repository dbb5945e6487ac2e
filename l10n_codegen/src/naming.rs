//! Maps definition names onto Rust identifiers.
//!
//! Message, argument and variable names are converted to `snake_case`;
//! language codes become a `snake_case` module name and an `UpperCamelCase`
//! type name with a `Localizer` suffix. Every result is checked with `syn` so
//! that keywords and names starting with a digit are rejected up front.

use heck::{ToSnakeCase, ToUpperCamelCase};

use crate::error::SchemaErrorKind;
use crate::ir::Language;

/// Name of the output buffer inside generated functions.
pub const BUFFER: &str = "out";

/// Name of the trait implemented by every generated localizer.
pub const TRAIT_NAME: &str = "Localizer";

fn checked(raw: &str, ident: String) -> Result<String, SchemaErrorKind> {
    if ident.is_empty() || syn::parse_str::<syn::Ident>(&ident).is_err() {
        return Err(SchemaErrorKind::InvalidIdentifier(raw.to_owned()));
    }
    Ok(ident)
}

/// Method name of a message.
///
/// # Errors
///
/// Returns [`SchemaErrorKind::InvalidIdentifier`] for names that do not map to
/// an identifier.
pub fn method_name(message: &str) -> Result<String, SchemaErrorKind> {
    checked(message, message.to_snake_case())
}

/// Parameter name of an argument.
///
/// # Errors
///
/// Returns [`SchemaErrorKind::InvalidIdentifier`] for names that do not map to
/// an identifier and [`SchemaErrorKind::ReservedName`] when the name would
/// shadow the output buffer.
pub fn parameter_name(argument: &str) -> Result<String, SchemaErrorKind> {
    let ident = checked(argument, argument.to_snake_case())?;
    if ident == BUFFER {
        return Err(SchemaErrorKind::ReservedName(argument.to_owned()));
    }
    Ok(ident)
}

/// Name of the auxiliary function compiled for a variable:
/// `<message>_<variable>` in `snake_case`.
///
/// # Errors
///
/// Returns [`SchemaErrorKind::InvalidIdentifier`] when the variable name does
/// not map to an identifier.
pub fn auxiliary_name(message: &str, variable: &str) -> Result<String, SchemaErrorKind> {
    checked(variable, variable.to_snake_case())?;
    checked(
        variable,
        format!("{}_{}", message.to_snake_case(), variable.to_snake_case()),
    )
}

/// Module name of a language, for example `pt_br` for `pt-BR`.
///
/// # Errors
///
/// Returns [`SchemaErrorKind::InvalidIdentifier`] when the code does not map
/// to an identifier.
pub fn module_name(language: &Language) -> Result<String, SchemaErrorKind> {
    checked(language.as_str(), language.as_str().to_snake_case())
}

/// Type name of a language's localizer, for example `PtBrLocalizer`.
///
/// # Errors
///
/// Returns [`SchemaErrorKind::InvalidIdentifier`] when the code does not map
/// to an identifier.
pub fn type_name(language: &Language) -> Result<String, SchemaErrorKind> {
    let camel = language.as_str().to_upper_camel_case();
    if camel.is_empty() {
        return Err(SchemaErrorKind::InvalidIdentifier(language.as_str().to_owned()));
    }
    checked(language.as_str(), format!("{camel}{TRAIT_NAME}"))
}
