//! Lowers one template body into an ordered list of output operations.
//!
//! Two modes exist. In accumulate mode each part appends to the output
//! buffer. Constant mode replaces the whole body with a single
//! [`Op::ReturnConstant`]; it is only chosen for literal-only bodies at the
//! top of a message and silently falls back to accumulate mode otherwise.

use crate::deps::Capability;
use crate::error::SchemaError;
use crate::ir::{FormatParts, Part, SemanticType};
use crate::resolve::{self, FormatOp};

use super::{Binding, ScopeContext};

/// A single output operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Append literal text to the buffer.
    AppendLiteral(String),
    /// Append an argument rendered through `format`.
    AppendArgument {
        /// Argument being rendered.
        binding: Binding,
        /// Declared type of the argument.
        ty: SemanticType,
        /// Resolved rendering.
        format: FormatOp,
    },
    /// Invoke the auxiliary function of a variable with the same buffer.
    CallVariable {
        /// Variable name as declared.
        variable: String,
        /// Auxiliary function name.
        function: String,
        /// Arguments forwarded to the auxiliary function, in its order.
        arguments: Vec<Binding>,
    },
    /// Return literal text immediately, bypassing the buffer.
    ReturnConstant(String),
}

/// How a body was lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Parts append to the output buffer.
    Accumulate,
    /// The body returns a literal.
    Constant,
}

/// Lowered form of one template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredParts {
    /// Mode the body was lowered in.
    pub mode: Mode,
    /// Operations in concatenation order.
    pub ops: Vec<Op>,
}

impl LoweredParts {
    /// Literal returned by a constant body.
    #[must_use]
    pub fn constant(&self) -> Option<&str> {
        match (self.mode, self.ops.as_slice()) {
            (Mode::Constant, [Op::ReturnConstant(text)]) => Some(text),
            _ => None,
        }
    }
}

/// Lowers `parts`, choosing constant mode when `allow_constant` is set and
/// the body is literal-only.
pub(crate) fn lower_parts(
    ctx: &mut ScopeContext<'_>,
    parts: &FormatParts,
    allow_constant: bool,
) -> Result<LoweredParts, SchemaError> {
    if allow_constant {
        if let Some(text) = parts.constant_text() {
            return Ok(LoweredParts {
                mode: Mode::Constant,
                ops: vec![Op::ReturnConstant(text)],
            });
        }
    }

    ctx.require(Capability::TextBuffer);
    let mut ops = Vec::with_capacity(parts.parts().len());
    for part in parts.parts() {
        let op = match part {
            Part::Literal(text) => {
                if text.is_empty() {
                    continue;
                }
                Op::AppendLiteral(text.clone())
            }
            Part::Argument { name, directive } => {
                let (binding, ty) = ctx.argument(name)?;
                let format = resolve::resolve(&ty, directive.as_ref())
                    .map_err(|kind| ctx.error(kind))?;
                ctx.require(format.capability());
                Op::AppendArgument {
                    binding,
                    ty,
                    format,
                }
            }
            Part::Variable(name) => ctx.variable_call(name)?,
        };
        merge_push(&mut ops, op);
    }
    Ok(LoweredParts {
        mode: Mode::Accumulate,
        ops,
    })
}

/// Pushes `op`, folding adjacent literals together.
fn merge_push(ops: &mut Vec<Op>, op: Op) {
    if let (Some(Op::AppendLiteral(last)), Op::AppendLiteral(text)) = (ops.last_mut(), &op) {
        last.push_str(text);
        return;
    }
    ops.push(op);
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface broken fixtures")]
mod tests {
    use super::*;
    use crate::config::IntegerWidth;
    use crate::deps::Dependencies;
    use crate::error::{Location, SchemaErrorKind};
    use crate::ir::{MessageScope, Template, VariableScope};
    use anyhow::{Result, ensure};
    use rstest::{fixture, rstest};

    #[fixture]
    fn scope() -> MessageScope {
        MessageScope::new("items")
            .with_argument("count", SemanticType::Integer)
            .with_argument("price", SemanticType::Float)
            .with_variable(
                VariableScope::new("total")
                    .with_argument("count")
                    .with_template(Template::Plain(FormatParts::new().argument("count"))),
            )
    }

    fn context<'a>(scope: &'a MessageScope, deps: &'a mut Dependencies) -> ScopeContext<'a> {
        ScopeContext::message(scope, Location::language("en"), IntegerWidth::I64, deps)
    }

    #[rstest]
    fn literal_body_becomes_constant_when_allowed(scope: MessageScope) -> Result<()> {
        let mut deps = Dependencies::new();
        let mut ctx = context(&scope, &mut deps);
        let parts = FormatParts::new().literal("no ").literal("items");
        let lowered = lower_parts(&mut ctx, &parts, true)?;
        ensure!(lowered.constant() == Some("no items"), "{lowered:?}");
        ensure!(deps.is_empty(), "constants need no capabilities");
        Ok(())
    }

    #[rstest]
    fn literal_body_accumulates_when_constant_disallowed(scope: MessageScope) -> Result<()> {
        let mut deps = Dependencies::new();
        let mut ctx = context(&scope, &mut deps);
        let parts = FormatParts::new().literal("none");
        let lowered = lower_parts(&mut ctx, &parts, false)?;
        ensure!(lowered.mode == Mode::Accumulate);
        ensure!(lowered.ops == vec![Op::AppendLiteral("none".to_owned())]);
        ensure!(deps.contains(Capability::TextBuffer));
        Ok(())
    }

    #[rstest]
    fn mixed_body_registers_capabilities(scope: MessageScope) -> Result<()> {
        let mut deps = Dependencies::new();
        let mut ctx = context(&scope, &mut deps);
        let parts = FormatParts::new()
            .argument("count")
            .literal(" items at ")
            .argument("price")
            .literal(" (")
            .variable("total")
            .literal(")");
        let lowered = lower_parts(&mut ctx, &parts, true)?;
        ensure!(lowered.mode == Mode::Accumulate);
        ensure!(lowered.ops.len() == 6, "{:?}", lowered.ops);
        ensure!(matches!(
            lowered.ops.get(4),
            Some(Op::CallVariable { function, .. }) if function == "items_total"
        ));
        for capability in [
            Capability::TextBuffer,
            Capability::IntegerToText,
            Capability::FloatToText,
        ] {
            ensure!(deps.contains(capability), "missing {capability:?}");
        }
        Ok(())
    }

    #[rstest]
    fn adjacent_literals_merge(scope: MessageScope) -> Result<()> {
        let mut deps = Dependencies::new();
        let mut ctx = context(&scope, &mut deps);
        let parts = FormatParts::new()
            .literal("a")
            .literal("")
            .literal("b")
            .argument("count");
        let lowered = lower_parts(&mut ctx, &parts, false)?;
        ensure!(lowered.ops.first() == Some(&Op::AppendLiteral("ab".to_owned())));
        Ok(())
    }

    #[rstest]
    fn unknown_argument_aborts(scope: MessageScope) {
        let mut deps = Dependencies::new();
        let mut ctx = context(&scope, &mut deps);
        let parts = FormatParts::new().argument("missing");
        let err = lower_parts(&mut ctx, &parts, false).expect_err("lowering fails");
        assert_eq!(
            err.kind,
            SchemaErrorKind::UnknownArgument("missing".to_owned())
        );
    }
}
