//! Renders single messages from compiled definitions.
//!
//! Preview arguments arrive as `name=value` strings and are typed by the
//! message's parameter list before evaluation.

use l10n_codegen::ir::SemanticType;
use l10n_codegen::{Compiled, EvalError, Value};

use crate::error::L10nError;

/// Renders `message` in the `requested` language, or in the first
/// registered language when none is given.
///
/// # Errors
///
/// Returns [`L10nError::PreviewArgument`] for malformed or ill-typed
/// arguments and [`L10nError::Eval`] when evaluation fails.
pub fn preview(
    compiled: &Compiled,
    requested: Option<&str>,
    message: &str,
    raw: &[String],
) -> Result<String, L10nError> {
    let language = requested
        .or_else(|| compiled.supported().next())
        .unwrap_or_default();
    let unit = compiled
        .localizer(language)
        .ok_or_else(|| EvalError::UnknownLanguage(language.to_owned()))?;
    let function = unit.message(message).ok_or_else(|| EvalError::UnknownMessage {
        language: language.to_owned(),
        message: message.to_owned(),
    })?;

    let mut args = Vec::with_capacity(raw.len());
    for argument in raw {
        let (name, text) = split(argument)?;
        let value = match function.param(name) {
            Some(param) => typed(argument, &param.ty, text)?,
            // Left for the evaluator to reject with the message's context.
            None => Value::Text(text.to_owned()),
        };
        args.push((name, value));
    }
    tracing::debug!(%language, %message, args = args.len(), "rendering preview");
    Ok(compiled.evaluate(language, message, &args)?)
}

/// Splits `name=value`; the value may be empty and may contain `=`.
fn split(argument: &str) -> Result<(&str, &str), L10nError> {
    match argument.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(L10nError::PreviewArgument {
            argument: argument.to_owned(),
            reason: "expected name=value".to_owned(),
        }),
    }
}

fn typed(argument: &str, ty: &SemanticType, text: &str) -> Result<Value, L10nError> {
    let invalid = |expected: &str| L10nError::PreviewArgument {
        argument: argument.to_owned(),
        reason: format!("expected {expected}"),
    };
    match ty {
        SemanticType::Text => Ok(Value::Text(text.to_owned())),
        SemanticType::Integer => text
            .trim()
            .parse::<i128>()
            .map(Value::Integer)
            .map_err(|_| invalid("an integer")),
        SemanticType::Float => text
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid("a number")),
        SemanticType::Display | SemanticType::Custom(_) => Ok(Value::Display(text.to_owned())),
    }
}
