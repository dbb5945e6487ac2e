//! Lowers validated localisations into function-level plans.
//!
//! Every message becomes one [`Function`] whose body is either a
//! [`Shape::Simple`] literal return or a [`Shape::General`] buffer fill.
//! Every variable becomes exactly one [`Shape::Auxiliary`] function that
//! writes into its caller's buffer, no matter how often it is referenced.
//! Lowering records the capabilities the plans need in [`Dependencies`].

pub mod format;
pub mod plural;

use std::collections::BTreeSet;

use crate::config::{CodegenConfig, IntegerWidth};
use crate::deps::{Capability, Dependencies};
use crate::error::{self, CodegenResult, Location, SchemaError, SchemaErrorKind};
use crate::ir::{Language, Localization, MessageScope, SemanticType, Template, VariableScope};
use crate::naming;

use format::{LoweredParts, Op};
use plural::Dispatch;

/// Pairs a declared argument name with its parameter identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Argument name as declared.
    pub argument: String,
    /// Parameter identifier in generated code.
    pub ident: String,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Argument the parameter carries.
    pub binding: Binding,
    /// Declared type.
    pub ty: SemanticType,
    /// Whether the body reads the parameter.
    pub used: bool,
}

/// Shape of a generated function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// No buffer; every path returns a literal.
    Simple,
    /// Declares a buffer, fills it and returns it. Literal-only plural arms
    /// may still return early.
    General,
    /// Fills a buffer owned by the caller.
    Auxiliary,
}

/// Control flow of a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Straight-line body.
    Sequence(LoweredParts),
    /// Plural dispatch.
    Dispatch(Dispatch),
}

/// Lowered plan for one generated function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Function identifier.
    pub name: String,
    /// Message or variable the function was lowered from.
    pub source: String,
    /// Body shape.
    pub shape: Shape,
    /// Parameters in signature order.
    pub params: Vec<Param>,
    /// Body.
    pub flow: Flow,
    /// `false` for variables nothing references.
    pub referenced: bool,
}

impl Function {
    /// Looks up a parameter by argument name.
    #[must_use]
    pub fn param(&self, argument: &str) -> Option<&Param> {
        self.params
            .iter()
            .find(|param| param.binding.argument == argument)
    }
}

/// All plans for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredLocalization {
    /// Language of the plans.
    pub language: Language,
    /// Message functions in declaration order.
    pub messages: Vec<Function>,
    /// Variable functions, grouped by message in declaration order.
    pub auxiliaries: Vec<Function>,
    /// Capabilities the generated unit relies on.
    pub dependencies: Dependencies,
}

impl LoweredLocalization {
    /// Looks up a message function by message name.
    #[must_use]
    pub fn message(&self, name: &str) -> Option<&Function> {
        self.messages.iter().find(|function| function.source == name)
    }

    /// Looks up an auxiliary function by identifier.
    #[must_use]
    pub fn auxiliary(&self, name: &str) -> Option<&Function> {
        self.auxiliaries.iter().find(|function| function.name == name)
    }
}

/// Name resolution and bookkeeping for the body being lowered.
pub(crate) struct ScopeContext<'a> {
    scope: &'a MessageScope,
    location: Location,
    integer: IntegerWidth,
    visible: Option<&'a [String]>,
    dependencies: &'a mut Dependencies,
    used: BTreeSet<String>,
}

impl<'a> ScopeContext<'a> {
    pub(crate) const fn message(
        scope: &'a MessageScope,
        location: Location,
        integer: IntegerWidth,
        dependencies: &'a mut Dependencies,
    ) -> Self {
        Self {
            scope,
            location,
            integer,
            visible: None,
            dependencies,
            used: BTreeSet::new(),
        }
    }

    pub(crate) const fn variable(
        scope: &'a MessageScope,
        variable: &'a VariableScope,
        location: Location,
        integer: IntegerWidth,
        dependencies: &'a mut Dependencies,
    ) -> Self {
        Self {
            scope,
            location,
            integer,
            visible: Some(variable.arguments.as_slice()),
            dependencies,
            used: BTreeSet::new(),
        }
    }

    pub(crate) fn error(&self, kind: SchemaErrorKind) -> SchemaError {
        SchemaError::new(self.location.clone(), kind)
    }

    pub(crate) const fn integer(&self) -> IntegerWidth {
        self.integer
    }

    pub(crate) fn require(&mut self, capability: Capability) {
        self.dependencies.require(capability);
    }

    /// Resolves an argument visible to the current body and marks it used.
    pub(crate) fn argument(&mut self, name: &str) -> Result<(Binding, SemanticType), SchemaError> {
        let scope = self.scope;
        let Some(argument) = scope.argument(name) else {
            return Err(self.error(SchemaErrorKind::UnknownArgument(name.to_owned())));
        };
        if let Some(visible) = self.visible {
            if !visible.iter().any(|candidate| candidate == name) {
                return Err(self.error(SchemaErrorKind::ArgumentNotInVariable(name.to_owned())));
            }
        }
        let ident = naming::parameter_name(name).map_err(|kind| self.error(kind))?;
        self.used.insert(name.to_owned());
        Ok((
            Binding {
                argument: name.to_owned(),
                ident,
            },
            argument.ty.clone(),
        ))
    }

    /// Resolves a variable reference into a call of its auxiliary function.
    pub(crate) fn variable_call(&mut self, name: &str) -> Result<Op, SchemaError> {
        let scope = self.scope;
        let Some(variable) = scope.variable(name) else {
            return Err(self.error(SchemaErrorKind::UnknownVariable(name.to_owned())));
        };
        let function =
            naming::auxiliary_name(&scope.name, name).map_err(|kind| self.error(kind))?;
        let arguments = variable
            .arguments
            .iter()
            .map(|argument| self.argument(argument).map(|(binding, _)| binding))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Op::CallVariable {
            variable: name.to_owned(),
            function,
            arguments,
        })
    }

    fn into_used(self) -> BTreeSet<String> {
        self.used
    }
}

fn lower_template(
    ctx: &mut ScopeContext<'_>,
    template: &Template,
    allow_constant: bool,
) -> Result<Flow, SchemaError> {
    match template {
        Template::Unset => Err(ctx.error(SchemaErrorKind::UnsetTemplate)),
        Template::Plain(parts) => {
            format::lower_parts(ctx, parts, allow_constant).map(Flow::Sequence)
        }
        Template::Plural(plural) => {
            plural::lower_plural(ctx, plural, allow_constant).map(Flow::Dispatch)
        }
    }
}

fn params_for<'n>(
    scope: &MessageScope,
    names: impl IntoIterator<Item = &'n str>,
    used: &BTreeSet<String>,
    location: &Location,
) -> Result<Vec<Param>, SchemaError> {
    names
        .into_iter()
        .map(|name| {
            let error = |kind| SchemaError::new(location.clone(), kind);
            let argument = scope
                .argument(name)
                .ok_or_else(|| error(SchemaErrorKind::VariableArgumentNotInMessage(name.to_owned())))?;
            let ident = naming::parameter_name(name).map_err(error)?;
            Ok(Param {
                binding: Binding {
                    argument: name.to_owned(),
                    ident,
                },
                ty: argument.ty.clone(),
                used: used.contains(name),
            })
        })
        .collect()
}

/// Names of variables reachable from the message body, directly or through
/// other reachable variables.
fn referenced_variables(scope: &MessageScope) -> BTreeSet<&str> {
    let mut referenced = BTreeSet::new();
    let mut pending = scope.template.variable_refs();
    while let Some(name) = pending.pop() {
        if referenced.insert(name)
            && let Some(variable) = scope.variables.iter().find(|variable| variable.name == name)
        {
            pending.extend(variable.template.variable_refs());
        }
    }
    referenced
}

/// Lowers one message and its variables.
///
/// Returns the message function followed by one auxiliary function per
/// variable, in declaration order.
///
/// # Errors
///
/// Returns the first [`SchemaError`] met while resolving names, types or
/// directives.
pub fn lower_scope(
    scope: &MessageScope,
    language: &Language,
    config: &CodegenConfig,
    dependencies: &mut Dependencies,
) -> Result<(Function, Vec<Function>), SchemaError> {
    let location = Location::language(language.as_str()).message(&scope.name);
    let name = naming::method_name(&scope.name)
        .map_err(|kind| SchemaError::new(location.clone(), kind))?;

    let shape = if scope.template.is_constant() {
        Shape::Simple
    } else {
        Shape::General
    };
    let mut ctx = ScopeContext::message(scope, location.clone(), config.integer, dependencies);
    let flow = lower_template(&mut ctx, &scope.template, true)?;
    let used = ctx.into_used();
    let params = params_for(
        scope,
        scope.arguments.iter().map(|argument| argument.name.as_str()),
        &used,
        &location,
    )?;
    let message = Function {
        name,
        source: scope.name.clone(),
        shape,
        params,
        flow,
        referenced: true,
    };

    let referenced = referenced_variables(scope);
    let mut auxiliaries = Vec::with_capacity(scope.variables.len());
    for variable in &scope.variables {
        let var_location = location.clone().variable(&variable.name);
        let function = naming::auxiliary_name(&scope.name, &variable.name)
            .map_err(|kind| SchemaError::new(var_location.clone(), kind))?;
        let is_referenced = referenced.contains(variable.name.as_str());
        // Unreferenced variables are checked but never emitted, so their
        // capabilities must not reach the unit's imports.
        let mut unemitted = Dependencies::new();
        let var_deps = if is_referenced {
            &mut *dependencies
        } else {
            &mut unemitted
        };
        let mut var_ctx = ScopeContext::variable(
            scope,
            variable,
            var_location.clone(),
            config.integer,
            var_deps,
        );
        let var_flow = lower_template(&mut var_ctx, &variable.template, false)?;
        let var_used = var_ctx.into_used();
        let var_params = params_for(
            scope,
            variable.arguments.iter().map(String::as_str),
            &var_used,
            &var_location,
        )?;
        if !is_referenced {
            tracing::warn!(
                language = %language,
                message = %scope.name,
                variable = %variable.name,
                "variable is never referenced"
            );
        }
        auxiliaries.push(Function {
            name: function,
            source: variable.name.clone(),
            shape: Shape::Auxiliary,
            params: var_params,
            flow: var_flow,
            referenced: is_referenced,
        });
    }
    tracing::debug!(
        language = %language,
        message = %scope.name,
        shape = ?message.shape,
        auxiliaries = auxiliaries.len(),
        "lowered message"
    );
    Ok((message, auxiliaries))
}

/// Lowers every message of a localisation.
///
/// # Errors
///
/// Returns every [`SchemaError`] met, aggregated into one
/// [`crate::CodegenError`]; a partially lowered localisation is never
/// returned.
pub fn lower_localization(
    localization: &Localization,
    config: &CodegenConfig,
) -> CodegenResult<LoweredLocalization> {
    let mut dependencies = Dependencies::new();
    let mut messages = Vec::with_capacity(localization.scopes.len());
    let mut auxiliaries = Vec::new();
    let mut errors = Vec::new();
    for scope in &localization.scopes {
        match lower_scope(scope, &localization.language, config, &mut dependencies) {
            Ok((message, aux)) => {
                messages.push(message);
                auxiliaries.extend(aux);
            }
            Err(err) => errors.push(err),
        }
    }
    error::collect(errors)?;
    tracing::debug!(
        language = %localization.language,
        messages = messages.len(),
        auxiliaries = auxiliaries.len(),
        capabilities = dependencies.len(),
        "lowered localization"
    );
    Ok(LoweredLocalization {
        language: localization.language.clone(),
        messages,
        auxiliaries,
        dependencies,
    })
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface broken fixtures")]
mod tests {
    use super::*;
    use crate::ir::{FormatParts, Plural, PluralCategory};
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;

    fn greeting() -> MessageScope {
        MessageScope::new("greeting")
            .with_argument("name", SemanticType::Text)
            .with_template(Template::Plain(
                FormatParts::new().literal("Hello, ").argument("name"),
            ))
    }

    fn items() -> MessageScope {
        MessageScope::new("items")
            .with_argument("count", SemanticType::Integer)
            .with_template(Template::Plural(
                Plural::new("count")
                    .with(PluralCategory::Zero, FormatParts::new().literal("no items"))
                    .with(PluralCategory::One, FormatParts::new().literal("1 item"))
                    .with(
                        PluralCategory::Other,
                        FormatParts::new().variable("total").literal(" items"),
                    ),
            ))
            .with_variable(
                VariableScope::new("total")
                    .with_argument("count")
                    .with_template(Template::Plain(FormatParts::new().argument("count"))),
            )
    }

    #[rstest]
    fn literal_message_is_simple() -> Result<()> {
        let scope = MessageScope::new("title")
            .with_template(Template::Plain(FormatParts::new().literal("Inbox")));
        let mut deps = Dependencies::new();
        let (function, aux) =
            lower_scope(&scope, &Language::new("en"), &CodegenConfig::default(), &mut deps)?;
        ensure!(function.shape == Shape::Simple);
        ensure!(aux.is_empty());
        ensure!(deps.is_empty(), "{deps:?}");
        Ok(())
    }

    #[rstest]
    fn argument_message_is_general() -> Result<()> {
        let mut deps = Dependencies::new();
        let (function, _) =
            lower_scope(&greeting(), &Language::new("en"), &CodegenConfig::default(), &mut deps)?;
        ensure!(function.shape == Shape::General);
        ensure!(function.params.len() == 1);
        ensure!(function.param("name").is_some_and(|param| param.used));
        ensure!(deps.contains(Capability::TextBuffer));
        Ok(())
    }

    #[rstest]
    fn each_variable_gets_one_auxiliary() -> Result<()> {
        let localization = Localization::new("en").with_scope(items());
        let lowered = lower_localization(&localization, &CodegenConfig::default())?;
        ensure!(lowered.auxiliaries.len() == 1);
        let aux = lowered
            .auxiliary("items_total")
            .ok_or_else(|| anyhow!("missing items_total"))?;
        ensure!(aux.shape == Shape::Auxiliary);
        ensure!(aux.referenced);
        ensure!(aux.params.len() == 1);
        let Flow::Sequence(body) = &aux.flow else {
            return Err(anyhow!("auxiliary should be straight-line"));
        };
        ensure!(body.constant().is_none(), "auxiliaries never return constants");
        Ok(())
    }

    #[rstest]
    fn unreferenced_variable_is_still_lowered() -> Result<()> {
        let scope = greeting().with_variable(
            VariableScope::new("unused")
                .with_template(Template::Plain(FormatParts::new().literal("x"))),
        );
        let localization = Localization::new("en").with_scope(scope);
        let lowered = lower_localization(&localization, &CodegenConfig::default())?;
        let aux = lowered
            .auxiliary("greeting_unused")
            .ok_or_else(|| anyhow!("missing greeting_unused"))?;
        ensure!(!aux.referenced);
        Ok(())
    }

    #[rstest]
    fn variables_reached_only_from_dead_variables_are_unreferenced() -> Result<()> {
        let scope = greeting()
            .with_variable(
                VariableScope::new("outer")
                    .with_template(Template::Plain(FormatParts::new().variable("inner"))),
            )
            .with_variable(
                VariableScope::new("inner")
                    .with_template(Template::Plain(FormatParts::new().literal("x"))),
            );
        let localization = Localization::new("en").with_scope(scope);
        let lowered = lower_localization(&localization, &CodegenConfig::default())?;
        for name in ["greeting_outer", "greeting_inner"] {
            let aux = lowered
                .auxiliary(name)
                .ok_or_else(|| anyhow!("missing {name}"))?;
            ensure!(!aux.referenced, "{name} is only reachable from dead code");
        }
        Ok(())
    }

    #[rstest]
    fn unused_parameter_is_flagged() -> Result<()> {
        let scope = MessageScope::new("bye")
            .with_argument("name", SemanticType::Text)
            .with_template(Template::Plain(FormatParts::new().literal("Bye")));
        let mut deps = Dependencies::new();
        let (function, _) =
            lower_scope(&scope, &Language::new("en"), &CodegenConfig::default(), &mut deps)?;
        ensure!(function.param("name").is_some_and(|param| !param.used));
        Ok(())
    }

    #[rstest]
    fn errors_from_several_messages_are_aggregated() {
        let localization = Localization::new("en")
            .with_scope(MessageScope::new("first"))
            .with_scope(MessageScope::new("second"));
        let err = lower_localization(&localization, &CodegenConfig::default())
            .expect_err("unset templates fail");
        assert_eq!(err.schema_errors().len(), 2);
    }
}
