//! Per-language tracking of helper capabilities used by generated code.
//!
//! Lowering registers a [`Capability`] every time it chooses an operation
//! that relies on one. The set only grows; once a language is lowered it is
//! handed to the emitter, which turns it into `use` items.

use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::quote;

/// External helper a generated function relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// A growable `String` output buffer.
    TextBuffer,
    /// Integer to text conversion through `ToString`.
    IntegerToText,
    /// Fixed-precision float rendering through `write!`.
    FloatToText,
    /// Directive-driven rendering through `write!`.
    PatternFormat,
    /// `Display` rendering through `write!`.
    Display,
}

impl Capability {
    /// Stable name used in logs and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextBuffer => "text-buffer",
            Self::IntegerToText => "integer-to-text",
            Self::FloatToText => "float-to-text",
            Self::PatternFormat => "pattern-format",
            Self::Display => "display",
        }
    }

    /// Import the generated unit needs for this capability, if any.
    #[must_use]
    pub const fn import(self) -> Option<Import> {
        match self {
            Self::TextBuffer | Self::IntegerToText => None,
            Self::FloatToText | Self::PatternFormat | Self::Display => Some(Import::FmtWrite),
        }
    }
}

/// `use` item emitted at the top of a generated language unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Import {
    /// `core::fmt::Write`, required by `write!` into a `String`.
    FmtWrite,
}

impl Import {
    /// Path as written in the `use` item.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::FmtWrite => "::core::fmt::Write",
        }
    }

    pub(crate) fn tokens(self) -> TokenStream {
        match self {
            Self::FmtWrite => quote! { use ::core::fmt::Write as _; },
        }
    }
}

/// Monotonically growing set of capabilities for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies(BTreeSet<Capability>);

impl Dependencies {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Registers a capability; returns `true` if it was not yet present.
    pub fn require(&mut self, capability: Capability) -> bool {
        let inserted = self.0.insert(capability);
        if inserted {
            tracing::debug!(capability = capability.as_str(), "registered capability");
        }
        inserted
    }

    /// Returns `true` if `capability` has been registered.
    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Registered capabilities in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// Number of registered capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deduplicated imports implied by the registered capabilities.
    #[must_use]
    pub fn imports(&self) -> BTreeSet<Import> {
        self.iter().filter_map(Capability::import).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn require_is_idempotent() {
        let mut deps = Dependencies::new();
        assert!(deps.require(Capability::TextBuffer));
        assert!(!deps.require(Capability::TextBuffer));
        assert_eq!(deps.len(), 1);
    }

    #[rstest]
    fn imports_deduplicate_fmt_write() {
        let mut deps = Dependencies::new();
        deps.require(Capability::FloatToText);
        deps.require(Capability::Display);
        deps.require(Capability::IntegerToText);
        let imports: Vec<_> = deps.imports().into_iter().collect();
        assert_eq!(imports, vec![Import::FmtWrite]);
    }

    #[rstest]
    #[case(Capability::TextBuffer)]
    #[case(Capability::IntegerToText)]
    fn prelude_capabilities_need_no_import(#[case] capability: Capability) {
        assert_eq!(capability.import(), None);
    }
}
