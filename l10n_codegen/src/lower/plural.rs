//! Lowers a plural template into a conditional dispatch.

use crate::error::{SchemaError, SchemaErrorKind};
use crate::ir::{Plural, PluralCategory};

use super::format::{self, LoweredParts};
use super::{Binding, ScopeContext};

/// Test guarding one branch of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Value equals the operand.
    Equals(u8),
    /// Value is strictly greater than the operand.
    GreaterThan(u8),
    /// Always taken.
    Otherwise,
}

impl Condition {
    /// Condition for a plural category.
    #[must_use]
    pub const fn for_category(category: PluralCategory) -> Self {
        match category {
            PluralCategory::Zero => Self::Equals(0),
            PluralCategory::One => Self::Equals(1),
            PluralCategory::Many => Self::GreaterThan(1),
            PluralCategory::Other => Self::Otherwise,
        }
    }

    /// Returns `true` when `value` satisfies the condition.
    #[must_use]
    pub fn matches(self, value: i128) -> bool {
        match self {
            Self::Equals(operand) => value == i128::from(operand),
            Self::GreaterThan(operand) => value > i128::from(operand),
            Self::Otherwise => true,
        }
    }
}

/// One guarded branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Category the branch came from.
    pub category: PluralCategory,
    /// Guard.
    pub condition: Condition,
    /// Lowered body.
    pub body: LoweredParts,
}

/// Lowered plural: branches tested in order, first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Integer argument driving the dispatch.
    pub driver: Binding,
    /// Branches in `zero`, `one`, `many`, `other` order.
    pub branches: Vec<Branch>,
    /// `zero`, `one` and `many` alone cover every value of the driver type.
    pub explicit_cover: bool,
}

impl Dispatch {
    /// First branch whose condition holds for `value`.
    #[must_use]
    pub fn select(&self, value: i128) -> Option<&Branch> {
        self.branches
            .iter()
            .find(|branch| branch.condition.matches(value))
    }

    /// Returns `true` when some value of the driver type matches no branch.
    #[must_use]
    pub fn needs_fallback(&self) -> bool {
        !self.explicit_cover && !self.has(PluralCategory::Other)
    }

    /// Returns `true` when the `other` branch can never be taken.
    #[must_use]
    pub fn other_unreachable(&self) -> bool {
        self.explicit_cover && self.has(PluralCategory::Other)
    }

    /// Branches some driver value can reach, in dispatch order.
    pub fn live_branches(&self) -> impl Iterator<Item = &Branch> {
        let dead_other = self.other_unreachable();
        self.branches
            .iter()
            .filter(move |branch| !(dead_other && branch.category == PluralCategory::Other))
    }

    fn has(&self, category: PluralCategory) -> bool {
        self.branches
            .iter()
            .any(|branch| branch.category == category)
    }

    /// Returns `true` when every branch returns a literal.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.branches
            .iter()
            .all(|branch| branch.body.constant().is_some())
    }
}

/// Lowers `plural`; branches may become constant returns only when
/// `allow_constant` is set.
pub(crate) fn lower_plural(
    ctx: &mut ScopeContext<'_>,
    plural: &Plural,
    allow_constant: bool,
) -> Result<Dispatch, SchemaError> {
    if plural.is_empty() {
        return Err(ctx.error(SchemaErrorKind::EmptyPlural));
    }
    let (driver, ty) = ctx.argument(&plural.argument)?;
    if !ty.is_integer() {
        return Err(ctx.error(SchemaErrorKind::PluralArgumentNotInteger {
            name: plural.argument.clone(),
            found: ty.to_string(),
        }));
    }

    let mut branches = Vec::with_capacity(4);
    for (category, parts) in plural.branches() {
        let body = format::lower_parts(ctx, parts, allow_constant)?;
        branches.push(Branch {
            category,
            condition: Condition::for_category(category),
            body,
        });
    }
    let explicit_cover = ctx.integer().is_unsigned()
        && [
            PluralCategory::Zero,
            PluralCategory::One,
            PluralCategory::Many,
        ]
        .into_iter()
        .all(|category| plural.branch(category).is_some());
    tracing::debug!(
        driver = %plural.argument,
        branches = branches.len(),
        explicit_cover,
        "lowered plural"
    );
    Ok(Dispatch {
        driver,
        branches,
        explicit_cover,
    })
}
