//! Compilation settings shared by every stage of the pipeline.
//!
//! A [`CodegenConfig`] is built once before compilation, usually by the
//! command-line front end, and is read-only afterwards.

use proc_macro2::TokenStream;
use quote::quote;

/// Rust integer type used for [`crate::ir::SemanticType::Integer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntegerWidth {
    /// `i64`; negative values reach only the `other` plural branch.
    #[default]
    I64,
    /// `u64`; `zero`, `one` and `many` together cover every value.
    U64,
}

impl IntegerWidth {
    /// Type name as written in generated code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::I64 => "i64",
            Self::U64 => "u64",
        }
    }

    /// Returns `true` for unsigned widths.
    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        matches!(self, Self::U64)
    }

    /// Returns `true` when `value` is representable in this width.
    #[must_use]
    pub fn contains(self, value: i128) -> bool {
        match self {
            Self::I64 => i64::try_from(value).is_ok(),
            Self::U64 => u64::try_from(value).is_ok(),
        }
    }

    pub(crate) fn tokens(self) -> TokenStream {
        match self {
            Self::I64 => quote! { i64 },
            Self::U64 => quote! { u64 },
        }
    }
}

impl std::str::FromStr for IntegerWidth {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "i64" => Ok(Self::I64),
            "u64" => Ok(Self::U64),
            other => Err(format!("unsupported integer width '{other}'; expected i64 or u64")),
        }
    }
}

/// Settings that shape generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenConfig {
    /// Name of the module the generated files are mounted as.
    pub module: String,
    /// Integer representation for integer arguments.
    pub integer: IntegerWidth,
    /// Tool name written into the generated-file header.
    pub generator: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            module: "l10n".to_owned(),
            integer: IntegerWidth::default(),
            generator: "cargo-l10n".to_owned(),
        }
    }
}

impl CodegenConfig {
    /// Header line placed at the top of every generated file.
    #[must_use]
    pub fn header(&self) -> String {
        format!("// Code generated by {}; DO NOT EDIT.\n", self.generator)
    }
}
