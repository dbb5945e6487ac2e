//! Interpreter for lowered localisations.
//!
//! [`Evaluator`] executes the same operation lists the emitter renders, so a
//! definition set can be previewed and tested without compiling generated
//! code. Rendering follows `core::fmt` semantics, including explicit format
//! specs.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::config::IntegerWidth;
use crate::ir::SemanticType;
use crate::lower::format::{LoweredParts, Op};
use crate::lower::{Binding, Flow, Function, LoweredLocalization};
use crate::resolve::{Align, FormatOp, FormatSpec, SpecKind};

/// Variable calls nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 64;

/// A concrete argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text.
    Text(String),
    /// Integer; wide enough for every `i64` and `u64` value.
    Integer(i128),
    /// Floating point.
    Float(f64),
    /// Pre-rendered output of a `Display` implementation.
    Display(String),
}

impl Value {
    /// Short name of the value's kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Display(_) => "display",
        }
    }

    const fn accepts(ty: &SemanticType, value: &Self) -> bool {
        matches!(
            (ty, value),
            (SemanticType::Text, Self::Text(_))
                | (SemanticType::Integer, Self::Integer(_))
                | (SemanticType::Float, Self::Float(_))
                | (SemanticType::Display | SemanticType::Custom(_), _)
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) | Self::Display(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(i128::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Integer(i128::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i128::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i128::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Errors raised while evaluating a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EvalError {
    /// The language is not registered.
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    /// The language has no such message.
    #[error("language '{language}' has no message '{message}'")]
    UnknownMessage {
        /// Language searched.
        language: String,
        /// Requested message.
        message: String,
    },

    /// A declared argument was not supplied.
    #[error("message '{message}' requires argument '{argument}'")]
    MissingArgument {
        /// Message being evaluated.
        message: String,
        /// Missing argument.
        argument: String,
    },

    /// An argument was supplied that the message does not declare.
    #[error("message '{message}' does not take argument '{argument}'")]
    UnexpectedArgument {
        /// Message being evaluated.
        message: String,
        /// Surplus argument.
        argument: String,
    },

    /// An argument value does not match the declared type.
    #[error("argument '{argument}' of '{message}' expects {expected}, got {found}")]
    ArgumentType {
        /// Message being evaluated.
        message: String,
        /// Offending argument.
        argument: String,
        /// Declared type.
        expected: String,
        /// Supplied value kind.
        found: &'static str,
    },

    /// An integer does not fit the configured width.
    #[error("argument '{argument}' of '{message}' does not fit {width}: {value}")]
    IntegerOutOfRange {
        /// Message being evaluated.
        message: String,
        /// Offending argument.
        argument: String,
        /// Supplied value.
        value: i128,
        /// Configured integer type.
        width: &'static str,
    },

    /// A variable call names a function that was not lowered.
    #[error("no auxiliary function '{0}'")]
    UnknownFunction(String),

    /// Variable calls nest deeper than [`MAX_DEPTH`].
    #[error("variable calls nest deeper than {MAX_DEPTH} at '{0}'")]
    RecursionLimit(String),
}

enum Step {
    Continue,
    Return(String),
}

type Env<'v> = BTreeMap<&'v str, &'v Value>;

/// Evaluates messages of one lowered localisation.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'u> {
    unit: &'u LoweredLocalization,
    integer: IntegerWidth,
}

impl<'u> Evaluator<'u> {
    /// Creates an evaluator for `unit`.
    #[must_use]
    pub const fn new(unit: &'u LoweredLocalization, integer: IntegerWidth) -> Self {
        Self { unit, integer }
    }

    /// Renders `message` with named argument values.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] for unknown messages and for missing,
    /// surplus or ill-typed arguments.
    pub fn evaluate(&self, message: &str, args: &[(&str, Value)]) -> Result<String, EvalError> {
        let Some(function) = self.unit.message(message) else {
            return Err(EvalError::UnknownMessage {
                language: self.unit.language.to_string(),
                message: message.to_owned(),
            });
        };
        let env = self.bind(function, args)?;
        let mut out = String::new();
        match self.run_flow(message, &function.flow, &env, &mut out, 0)? {
            Step::Return(text) => Ok(text),
            Step::Continue => Ok(out),
        }
    }

    fn bind<'v>(&self, function: &Function, args: &'v [(&'v str, Value)]) -> Result<Env<'v>, EvalError> {
        if let Some((name, _)) = args
            .iter()
            .find(|(name, _)| function.param(name).is_none())
        {
            return Err(EvalError::UnexpectedArgument {
                message: function.source.clone(),
                argument: (*name).to_owned(),
            });
        }
        let mut env = Env::new();
        for param in &function.params {
            let argument = param.binding.argument.as_str();
            let Some((name, value)) = args.iter().find(|(name, _)| *name == argument) else {
                return Err(EvalError::MissingArgument {
                    message: function.source.clone(),
                    argument: argument.to_owned(),
                });
            };
            if !Value::accepts(&param.ty, value) {
                return Err(EvalError::ArgumentType {
                    message: function.source.clone(),
                    argument: argument.to_owned(),
                    expected: param.ty.to_string(),
                    found: value.kind(),
                });
            }
            if let Value::Integer(number) = value
                && !self.integer.contains(*number)
            {
                return Err(EvalError::IntegerOutOfRange {
                    message: function.source.clone(),
                    argument: argument.to_owned(),
                    value: *number,
                    width: self.integer.as_str(),
                });
            }
            env.insert(*name, value);
        }
        Ok(env)
    }

    /// Runs one function body; `message` names the message being rendered
    /// and is carried into every error.
    fn run_flow(
        &self,
        message: &str,
        flow: &Flow,
        env: &Env<'_>,
        out: &mut String,
        depth: usize,
    ) -> Result<Step, EvalError> {
        match flow {
            Flow::Sequence(parts) => self.run_parts(message, parts, env, out, depth),
            Flow::Dispatch(dispatch) => {
                let value = match lookup(message, env, &dispatch.driver)? {
                    Value::Integer(number) => *number,
                    other => {
                        return Err(EvalError::ArgumentType {
                            message: message.to_owned(),
                            argument: dispatch.driver.argument.clone(),
                            expected: SemanticType::Integer.to_string(),
                            found: other.kind(),
                        });
                    }
                };
                match dispatch.select(value) {
                    Some(branch) => self.run_parts(message, &branch.body, env, out, depth),
                    None => Ok(Step::Continue),
                }
            }
        }
    }

    fn run_parts(
        &self,
        message: &str,
        parts: &LoweredParts,
        env: &Env<'_>,
        out: &mut String,
        depth: usize,
    ) -> Result<Step, EvalError> {
        for op in &parts.ops {
            match op {
                Op::AppendLiteral(text) => out.push_str(text),
                Op::AppendArgument {
                    binding, format, ..
                } => render(format, lookup(message, env, binding)?, out),
                Op::CallVariable {
                    function,
                    arguments,
                    ..
                } => self.call(message, function, arguments, env, out, depth)?,
                Op::ReturnConstant(text) => return Ok(Step::Return(text.clone())),
            }
        }
        Ok(Step::Continue)
    }

    fn call(
        &self,
        message: &str,
        name: &str,
        arguments: &[Binding],
        env: &Env<'_>,
        out: &mut String,
        depth: usize,
    ) -> Result<(), EvalError> {
        if depth >= MAX_DEPTH {
            return Err(EvalError::RecursionLimit(name.to_owned()));
        }
        let Some(function) = self.unit.auxiliary(name) else {
            return Err(EvalError::UnknownFunction(name.to_owned()));
        };
        let mut callee = Env::new();
        for binding in arguments {
            let Some((key, value)) = env.get_key_value(binding.argument.as_str()) else {
                return Err(missing(message, binding));
            };
            callee.insert(*key, *value);
        }
        if let Step::Return(text) =
            self.run_flow(message, &function.flow, &callee, out, depth + 1)?
        {
            out.push_str(&text);
        }
        Ok(())
    }
}

fn lookup<'v>(message: &str, env: &Env<'v>, binding: &Binding) -> Result<&'v Value, EvalError> {
    env.get(binding.argument.as_str())
        .copied()
        .ok_or_else(|| missing(message, binding))
}

fn missing(message: &str, binding: &Binding) -> EvalError {
    EvalError::MissingArgument {
        message: message.to_owned(),
        argument: binding.argument.clone(),
    }
}

fn render(format: &FormatOp, value: &Value, out: &mut String) {
    match (format, value) {
        (FormatOp::FixedFloat { precision }, Value::Float(number)) => {
            out.push_str(&format!("{number:.precision$}"));
        }
        (FormatOp::Pattern(spec), _) => out.push_str(&apply_spec(spec, value)),
        _ => out.push_str(&value.to_string()),
    }
}

/// Renders `value` the way `format!` renders it through `spec`.
#[must_use]
pub fn apply_spec(spec: &FormatSpec, value: &Value) -> String {
    match value {
        Value::Integer(number) => {
            let (sign, digits) = integer_parts(spec, *number);
            pad_numeric(spec, sign, prefix(spec), &digits)
        }
        Value::Float(number) => {
            let (sign, digits) = float_parts(spec, *number);
            pad_numeric(spec, sign, "", &digits)
        }
        Value::Text(text) | Value::Display(text) => {
            let truncated: String = match spec.precision {
                Some(max) => text.chars().take(max).collect(),
                None => text.clone(),
            };
            pad(spec, &truncated, Align::Left)
        }
    }
}

const fn prefix(spec: &FormatSpec) -> &'static str {
    match (spec.alternate, spec.kind.radix_prefix()) {
        (true, Some(prefix)) => prefix,
        _ => "",
    }
}

const fn plus(spec: &FormatSpec) -> &'static str {
    if spec.sign_plus { "+" } else { "" }
}

fn integer_parts(spec: &FormatSpec, number: i128) -> (&'static str, String) {
    let magnitude = number.unsigned_abs();
    let sign = if number < 0 { "-" } else { plus(spec) };
    match spec.kind {
        SpecKind::Display => (sign, magnitude.to_string()),
        SpecKind::LowerExp => (sign, format!("{magnitude:e}")),
        SpecKind::UpperExp => (sign, format!("{magnitude:E}")),
        SpecKind::LowerHex => (plus(spec), radix(number, |bits| format!("{bits:x}"))),
        SpecKind::UpperHex => (plus(spec), radix(number, |bits| format!("{bits:X}"))),
        SpecKind::Octal => (plus(spec), radix(number, |bits| format!("{bits:o}"))),
        SpecKind::Binary => (plus(spec), radix(number, |bits| format!("{bits:b}"))),
    }
}

/// Radix forms print the 64-bit two's complement pattern without a sign.
/// Values above `i64::MAX` only occur for `u64` and print unchanged.
fn radix(number: i128, digits: impl Fn(u64) -> String) -> String {
    match i64::try_from(number) {
        Ok(narrow) => digits(narrow.cast_unsigned()),
        Err(_) => u64::try_from(number).map_or_else(|_| number.to_string(), digits),
    }
}

fn float_parts(spec: &FormatSpec, number: f64) -> (&'static str, String) {
    if number.is_nan() {
        return ("", "NaN".to_owned());
    }
    let sign = if number.is_sign_negative() { "-" } else { plus(spec) };
    let magnitude = number.abs();
    let digits = match (spec.kind, spec.precision) {
        (SpecKind::LowerExp, Some(precision)) => format!("{magnitude:.precision$e}"),
        (SpecKind::LowerExp, None) => format!("{magnitude:e}"),
        (SpecKind::UpperExp, Some(precision)) => format!("{magnitude:.precision$E}"),
        (SpecKind::UpperExp, None) => format!("{magnitude:E}"),
        (_, Some(precision)) => format!("{magnitude:.precision$}"),
        (_, None) => format!("{magnitude}"),
    };
    (sign, digits)
}

fn pad_numeric(spec: &FormatSpec, sign: &str, prefix: &str, digits: &str) -> String {
    let body = format!("{sign}{prefix}{digits}");
    if !spec.zero {
        return pad(spec, &body, Align::Right);
    }
    let len = body.chars().count();
    let width = spec.width.unwrap_or(0);
    if len >= width {
        return body;
    }
    format!("{sign}{prefix}{}{digits}", "0".repeat(width - len))
}

fn pad(spec: &FormatSpec, body: &str, default: Align) -> String {
    let len = body.chars().count();
    let width = spec.width.unwrap_or(0);
    if len >= width {
        return body.to_owned();
    }
    let total = width - len;
    let (before, after) = match spec.align.unwrap_or(default) {
        Align::Left => (0, total),
        Align::Right => (total, 0),
        Align::Center => {
            let half = total.div_euclid(2);
            (half, total - half)
        }
    };
    let fill = spec.fill.unwrap_or(' ');
    let mut out = String::with_capacity(body.len() + total);
    out.extend(std::iter::repeat_n(fill, before));
    out.push_str(body);
    out.extend(std::iter::repeat_n(fill, after));
    out
}
