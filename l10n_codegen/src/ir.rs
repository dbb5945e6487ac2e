//! Intermediate representation for localised message definitions.
//!
//! The IR is built once by a definition loader, validated, lowered exactly
//! once per language, and then discarded. Nothing here knows about Rust
//! syntax; see [`crate::emit`] for that.

use std::fmt;

/// Opaque language identifier such as `en` or `pt_br`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Language(String);

impl Language {
    /// Wraps a language code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the language code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Language {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Path to a user-defined displayable type, for example `crate::money::Money`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypePath(String);

impl TypePath {
    /// Wraps a Rust type path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Semantic type of a message argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Borrowed text, appended verbatim.
    Text,
    /// Signed or unsigned integer, depending on configuration.
    Integer,
    /// Double-precision floating point.
    Float,
    /// Any value implementing `Display`, passed as a trait object.
    Display,
    /// A named user type implementing `Display`.
    Custom(TypePath),
}

impl SemanticType {
    /// Returns `true` for [`SemanticType::Integer`].
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Integer)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Display => f.write_str("display"),
            Self::Custom(path) => write!(f, "custom({path})"),
        }
    }
}

/// A named, typed message argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Argument name, unique within its message.
    pub name: String,
    /// Declared semantic type.
    pub ty: SemanticType,
}

impl Argument {
    /// Creates an argument.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Explicit formatting directive attached to an argument reference.
///
/// The directive is a Rust format spec such as `>8.2` or `#x`; it is parsed
/// by [`crate::resolve::FormatSpec::parse`] during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDirective(String);

impl FormatDirective {
    /// Wraps a raw format spec.
    #[must_use]
    pub fn new(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    /// Returns the raw format spec.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One element of a template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Literal text.
    Literal(String),
    /// Reference to a message argument.
    Argument {
        /// Referenced argument name.
        name: String,
        /// Optional explicit format directive.
        directive: Option<FormatDirective>,
    },
    /// Reference to a variable scope of the owning message.
    Variable(String),
}

/// Ordered template body; order is concatenation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatParts(Vec<Part>);

impl FormatParts {
    /// Creates an empty template body.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a literal fragment.
    #[must_use]
    pub fn literal(mut self, text: impl Into<String>) -> Self {
        self.0.push(Part::Literal(text.into()));
        self
    }

    /// Appends an argument reference without a directive.
    #[must_use]
    pub fn argument(mut self, name: impl Into<String>) -> Self {
        self.0.push(Part::Argument {
            name: name.into(),
            directive: None,
        });
        self
    }

    /// Appends an argument reference carrying an explicit directive.
    #[must_use]
    pub fn formatted(mut self, name: impl Into<String>, directive: impl Into<String>) -> Self {
        self.0.push(Part::Argument {
            name: name.into(),
            directive: Some(FormatDirective::new(directive)),
        });
        self
    }

    /// Appends a variable reference.
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.0.push(Part::Variable(name.into()));
        self
    }

    /// Appends an arbitrary part.
    pub fn push(&mut self, part: Part) {
        self.0.push(part);
    }

    /// Returns the parts in order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.0
    }

    /// Returns `true` when the body has no parts at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when every part is literal text.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.0.iter().all(|part| matches!(part, Part::Literal(_)))
    }

    /// Concatenates the literal parts, or `None` if any part is not literal.
    #[must_use]
    pub fn constant_text(&self) -> Option<String> {
        self.0.iter().try_fold(String::new(), |mut acc, part| match part {
            Part::Literal(text) => {
                acc.push_str(text);
                Some(acc)
            }
            Part::Argument { .. } | Part::Variable(_) => None,
        })
    }

    /// Iterates over referenced argument names, in order, with repeats.
    pub fn argument_refs(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|part| match part {
            Part::Argument { name, .. } => Some(name.as_str()),
            Part::Literal(_) | Part::Variable(_) => None,
        })
    }

    /// Iterates over referenced variable names, in order, with repeats.
    pub fn variable_refs(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|part| match part {
            Part::Variable(name) => Some(name.as_str()),
            Part::Literal(_) | Part::Argument { .. } => None,
        })
    }
}

impl FromIterator<Part> for FormatParts {
    fn from_iter<I: IntoIterator<Item = Part>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Plural category, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PluralCategory {
    /// Driving value equals zero.
    Zero,
    /// Driving value equals one.
    One,
    /// Driving value is greater than one.
    Many,
    /// Unconditional default.
    Other,
}

impl PluralCategory {
    /// All categories in the order branches are tested.
    pub const ALL: [Self; 4] = [Self::Zero, Self::One, Self::Many, Self::Other];

    /// Lower-case category name as used in definition files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plural template driven by one integer argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plural {
    /// Name of the integer argument selecting the branch.
    pub argument: String,
    /// Branch for `argument == 0`.
    pub zero: Option<FormatParts>,
    /// Branch for `argument == 1`.
    pub one: Option<FormatParts>,
    /// Branch for `argument > 1`.
    pub many: Option<FormatParts>,
    /// Default branch.
    pub other: Option<FormatParts>,
}

impl Plural {
    /// Creates a plural with no branches.
    #[must_use]
    pub fn new(argument: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            zero: None,
            one: None,
            many: None,
            other: None,
        }
    }

    /// Sets the branch for `category`, replacing any previous body.
    #[must_use]
    pub fn with(mut self, category: PluralCategory, parts: FormatParts) -> Self {
        *self.branch_mut(category) = Some(parts);
        self
    }

    /// Returns the body for `category`, if present.
    #[must_use]
    pub const fn branch(&self, category: PluralCategory) -> Option<&FormatParts> {
        match category {
            PluralCategory::Zero => self.zero.as_ref(),
            PluralCategory::One => self.one.as_ref(),
            PluralCategory::Many => self.many.as_ref(),
            PluralCategory::Other => self.other.as_ref(),
        }
    }

    fn branch_mut(&mut self, category: PluralCategory) -> &mut Option<FormatParts> {
        match category {
            PluralCategory::Zero => &mut self.zero,
            PluralCategory::One => &mut self.one,
            PluralCategory::Many => &mut self.many,
            PluralCategory::Other => &mut self.other,
        }
    }

    /// Present branches in dispatch order.
    pub fn branches(&self) -> impl Iterator<Item = (PluralCategory, &FormatParts)> {
        PluralCategory::ALL
            .into_iter()
            .filter_map(|category| self.branch(category).map(|parts| (category, parts)))
    }

    /// Returns `true` when no branch is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches().next().is_none()
    }

    /// Returns `true` when every present branch is literal-only.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.branches().all(|(_, parts)| parts.is_constant())
    }
}

/// The active template of a message or variable scope.
///
/// A scope carries at most one template kind, so "plain and plural at once"
/// cannot be represented. [`Template::Unset`] is rejected by validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Template {
    /// No template was supplied.
    #[default]
    Unset,
    /// A single template body.
    Plain(FormatParts),
    /// A plural dispatch over several bodies.
    Plural(Plural),
}

impl Template {
    /// Returns `true` when the whole tree is literal-only.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Unset => false,
            Self::Plain(parts) => parts.is_constant(),
            Self::Plural(plural) => plural.is_constant(),
        }
    }

    /// Every body in the template, in dispatch order.
    #[must_use]
    pub fn bodies(&self) -> Vec<&FormatParts> {
        match self {
            Self::Unset => Vec::new(),
            Self::Plain(parts) => vec![parts],
            Self::Plural(plural) => plural.branches().map(|(_, parts)| parts).collect(),
        }
    }

    /// Argument names used by the template, including the plural driver.
    #[must_use]
    pub fn argument_refs(&self) -> Vec<&str> {
        let mut names = Vec::new();
        if let Self::Plural(plural) = self {
            names.push(plural.argument.as_str());
        }
        names.extend(self.bodies().into_iter().flat_map(FormatParts::argument_refs));
        names
    }

    /// Variable names used by the template.
    #[must_use]
    pub fn variable_refs(&self) -> Vec<&str> {
        self.bodies()
            .into_iter()
            .flat_map(FormatParts::variable_refs)
            .collect()
    }
}

/// A shared sub-template of a message, compiled once as an auxiliary function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableScope {
    /// Variable name, unique within the owning message.
    pub name: String,
    /// Names of the parent's arguments the variable receives, in parent order.
    pub arguments: Vec<String>,
    /// Variable body.
    pub template: Template,
}

impl VariableScope {
    /// Creates a variable with no arguments and no template.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            template: Template::Unset,
        }
    }

    /// Adds a received argument name.
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>) -> Self {
        self.arguments.push(name.into());
        self
    }

    /// Sets the template.
    #[must_use]
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }
}

/// A named, top-level message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageScope {
    /// Message name, unique within its localisation.
    pub name: String,
    /// Declared arguments in signature order.
    pub arguments: Vec<Argument>,
    /// Message body.
    pub template: Template,
    /// Shared sub-templates.
    pub variables: Vec<VariableScope>,
}

impl MessageScope {
    /// Creates a message with no arguments and no template.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            template: Template::Unset,
            variables: Vec::new(),
        }
    }

    /// Adds an argument.
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, ty: SemanticType) -> Self {
        self.arguments.push(Argument::new(name, ty));
        self
    }

    /// Sets the template.
    #[must_use]
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    /// Adds a variable scope.
    #[must_use]
    pub fn with_variable(mut self, variable: VariableScope) -> Self {
        self.variables.push(variable);
        self
    }

    /// Looks up a declared argument by name.
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|arg| arg.name == name)
    }

    /// Looks up a variable scope by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&VariableScope> {
        self.variables.iter().find(|var| var.name == name)
    }
}

/// All messages of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
    /// Language the messages are written in.
    pub language: Language,
    /// Messages in declaration order.
    pub scopes: Vec<MessageScope>,
}

impl Localization {
    /// Creates an empty localisation.
    #[must_use]
    pub fn new(language: impl Into<Language>) -> Self {
        Self {
            language: language.into(),
            scopes: Vec::new(),
        }
    }

    /// Adds a message.
    #[must_use]
    pub fn with_scope(mut self, scope: MessageScope) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Looks up a message by name.
    #[must_use]
    pub fn scope(&self, name: &str) -> Option<&MessageScope> {
        self.scopes.iter().find(|scope| scope.name == name)
    }
}
