//! Maps an argument's semantic type and optional directive to a formatting
//! operation.
//!
//! Resolution is a pure function of `(type, directive)`. An explicit
//! directive always wins over the type-derived default.

use std::fmt;

use crate::deps::Capability;
use crate::error::SchemaErrorKind;
use crate::ir::{FormatDirective, SemanticType};

/// Fractional digits used when a float has no explicit directive.
pub const DEFAULT_FLOAT_PRECISION: usize = 6;

/// How an argument value becomes text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOp {
    /// Text is appended as-is.
    PassThrough,
    /// Base-10 integer rendering.
    IntegerToText,
    /// Base-10 float rendering with a fixed number of fractional digits.
    FixedFloat {
        /// Fractional digits.
        precision: usize,
    },
    /// Rendering through an explicit format spec.
    Pattern(FormatSpec),
    /// Rendering through the value's `Display` implementation.
    Display,
}

impl FormatOp {
    /// Capability the operation needs in generated code.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        match self {
            Self::PassThrough => Capability::TextBuffer,
            Self::IntegerToText => Capability::IntegerToText,
            Self::FixedFloat { .. } => Capability::FloatToText,
            Self::Pattern(_) => Capability::PatternFormat,
            Self::Display => Capability::Display,
        }
    }
}

/// Resolves the formatting operation for one argument reference.
///
/// # Errors
///
/// Returns [`SchemaErrorKind::InvalidDirective`] when the directive does not
/// parse or does not suit the argument type.
pub fn resolve(
    ty: &SemanticType,
    directive: Option<&FormatDirective>,
) -> Result<FormatOp, SchemaErrorKind> {
    if let Some(directive) = directive {
        let spec = FormatSpec::parse(directive.as_str()).map_err(|reason| invalid(directive, reason))?;
        spec.check_type(ty).map_err(|reason| invalid(directive, reason))?;
        return Ok(FormatOp::Pattern(spec));
    }
    Ok(match ty {
        SemanticType::Text => FormatOp::PassThrough,
        SemanticType::Integer => FormatOp::IntegerToText,
        SemanticType::Float => FormatOp::FixedFloat {
            precision: DEFAULT_FLOAT_PRECISION,
        },
        SemanticType::Display | SemanticType::Custom(_) => FormatOp::Display,
    })
}

fn invalid(directive: &FormatDirective, reason: impl Into<String>) -> SchemaErrorKind {
    SchemaErrorKind::InvalidDirective {
        directive: directive.as_str().to_owned(),
        reason: reason.into(),
    }
}

/// Text alignment within the padded width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `<`
    Left,
    /// `^`
    Center,
    /// `>`
    Right,
}

impl Align {
    const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '<' => Some(Self::Left),
            '^' => Some(Self::Center),
            '>' => Some(Self::Right),
            _ => None,
        }
    }

    const fn as_char(self) -> char {
        match self {
            Self::Left => '<',
            Self::Center => '^',
            Self::Right => '>',
        }
    }
}

/// Formatting trait selected by the format spec's trailing type character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpecKind {
    /// No type character.
    #[default]
    Display,
    /// `x`
    LowerHex,
    /// `X`
    UpperHex,
    /// `o`
    Octal,
    /// `b`
    Binary,
    /// `e`
    LowerExp,
    /// `E`
    UpperExp,
}

impl SpecKind {
    fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "" => Ok(Self::Display),
            "x" => Ok(Self::LowerHex),
            "X" => Ok(Self::UpperHex),
            "o" => Ok(Self::Octal),
            "b" => Ok(Self::Binary),
            "e" => Ok(Self::LowerExp),
            "E" => Ok(Self::UpperExp),
            other => Err(format!("unsupported type '{other}'")),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Display => "",
            Self::LowerHex => "x",
            Self::UpperHex => "X",
            Self::Octal => "o",
            Self::Binary => "b",
            Self::LowerExp => "e",
            Self::UpperExp => "E",
        }
    }

    /// Radix prefix printed by the alternate flag, if any.
    #[must_use]
    pub const fn radix_prefix(self) -> Option<&'static str> {
        match self {
            Self::LowerHex | Self::UpperHex => Some("0x"),
            Self::Octal => Some("0o"),
            Self::Binary => Some("0b"),
            Self::Display | Self::LowerExp | Self::UpperExp => None,
        }
    }
}

/// Parsed Rust format spec: `[[fill]align][sign]['#']['0'][width]['.'precision][type]`.
///
/// Runtime width or precision arguments (`$`, `*`) are not supported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSpec {
    /// Padding character; defaults to a space.
    pub fill: Option<char>,
    /// Alignment within `width`.
    pub align: Option<Align>,
    /// Always print a sign for numbers.
    pub sign_plus: bool,
    /// Alternate form (`#`).
    pub alternate: bool,
    /// Sign-aware zero padding.
    pub zero: bool,
    /// Minimum width in characters.
    pub width: Option<usize>,
    /// Fractional digits for floats, maximum characters for text.
    pub precision: Option<usize>,
    /// Formatting trait.
    pub kind: SpecKind,
}

impl FormatSpec {
    /// Parses a format spec.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the spec is malformed.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut spec = Self::default();
        let mut rest = raw;

        let mut chars = rest.chars();
        let first = chars.next();
        let second = chars.next();
        match (first, second.and_then(Align::from_char)) {
            (Some(fill), Some(align)) => {
                if matches!(fill, '{' | '}') {
                    return Err("braces cannot be used as fill".to_owned());
                }
                spec.fill = Some(fill);
                spec.align = Some(align);
                rest = skip_chars(rest, 2);
            }
            _ => {
                if let Some(align) = first.and_then(Align::from_char) {
                    spec.align = Some(align);
                    rest = skip_chars(rest, 1);
                }
            }
        }

        if let Some(stripped) = rest.strip_prefix('+') {
            spec.sign_plus = true;
            rest = stripped;
        } else if rest.starts_with('-') {
            return Err("the '-' flag is not supported".to_owned());
        }
        if let Some(stripped) = rest.strip_prefix('#') {
            spec.alternate = true;
            rest = stripped;
        }
        if let Some(stripped) = rest.strip_prefix('0') {
            spec.zero = true;
            rest = stripped;
        }

        let (width, after_width) = take_digits(rest);
        spec.width = width;
        rest = after_width;

        if let Some(stripped) = rest.strip_prefix('.') {
            let (precision, after_precision) = take_digits(stripped);
            if precision.is_none() {
                return Err("precision must be a literal number".to_owned());
            }
            spec.precision = precision;
            rest = after_precision;
        }

        if rest.contains(['$', '*']) {
            return Err("runtime width and precision are not supported".to_owned());
        }
        spec.kind = SpecKind::parse(rest)?;
        Ok(spec)
    }

    /// Checks that the spec is meaningful for `ty`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the spec does not suit `ty`.
    pub fn check_type(&self, ty: &SemanticType) -> Result<(), String> {
        let numeric_flags = self.sign_plus || self.zero;
        match ty {
            SemanticType::Integer => {
                if self.precision.is_some() {
                    return Err("integers do not take a precision".to_owned());
                }
                Ok(())
            }
            SemanticType::Float => match self.kind {
                SpecKind::Display | SpecKind::LowerExp | SpecKind::UpperExp => Ok(()),
                other => Err(format!("floats cannot use '{}'", other.as_str())),
            },
            SemanticType::Text | SemanticType::Display | SemanticType::Custom(_) => {
                if self.kind != SpecKind::Display {
                    return Err(format!("{ty} values cannot use '{}'", self.kind.as_str()));
                }
                if numeric_flags {
                    return Err(format!("{ty} values do not take '+' or '0'"));
                }
                Ok(())
            }
        }
    }

    /// The `format!` pattern applying this spec to the captured `argument`,
    /// for example `{price:>8.2}`.
    #[must_use]
    pub fn pattern(&self, argument: &str) -> String {
        format!("{{{argument}:{self}}}")
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(align) = self.align {
            if let Some(fill) = self.fill {
                write!(f, "{fill}")?;
            }
            write!(f, "{}", align.as_char())?;
        }
        if self.sign_plus {
            f.write_str("+")?;
        }
        if self.alternate {
            f.write_str("#")?;
        }
        if self.zero {
            f.write_str("0")?;
        }
        if let Some(width) = self.width {
            write!(f, "{width}")?;
        }
        if let Some(precision) = self.precision {
            write!(f, ".{precision}")?;
        }
        f.write_str(self.kind.as_str())
    }
}

fn skip_chars(raw: &str, count: usize) -> &str {
    raw.char_indices()
        .nth(count)
        .map_or("", |(idx, _)| raw.get(idx..).unwrap_or(""))
}

fn take_digits(raw: &str) -> (Option<usize>, &str) {
    let end = raw
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(raw.len(), |(idx, _)| idx);
    let (digits, rest) = raw.split_at(end);
    (digits.parse().ok(), rest)
}
