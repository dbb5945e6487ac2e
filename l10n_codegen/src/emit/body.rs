//! Token generation for generated functions and their bodies.

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::Ident;

use crate::config::IntegerWidth;
use crate::error::{CodegenError, CodegenResult, Location, SchemaError};
use crate::ir::{Argument, Language, SemanticType};
use crate::lower::format::{LoweredParts, Op};
use crate::lower::plural::{Condition, Dispatch};
use crate::lower::{Flow, Function, Param, Shape};
use crate::naming;
use crate::resolve::FormatOp;
use crate::unify::MethodSig;

/// Whether the output buffer is a local `String` or a `&mut String` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Buffer {
    Owned,
    Borrowed,
}

pub(super) fn ident(name: &str) -> CodegenResult<Ident> {
    syn::parse_str::<Ident>(name).map_err(|source| CodegenError::Render {
        unit: name.to_owned(),
        source,
    })
}

pub(super) fn param_type(ty: &SemanticType, integer: IntegerWidth) -> CodegenResult<TokenStream> {
    Ok(match ty {
        SemanticType::Text => quote! { &str },
        SemanticType::Integer => integer.tokens(),
        SemanticType::Float => quote! { f64 },
        SemanticType::Display => quote! { &dyn ::core::fmt::Display },
        SemanticType::Custom(path) => {
            let parsed: syn::Path =
                syn::parse_str(path.as_str()).map_err(|source| CodegenError::Render {
                    unit: path.to_string(),
                    source,
                })?;
            quote! { &#parsed }
        }
    })
}

/// Trait method declaration for one contract entry.
pub(super) fn trait_method(
    sig: &MethodSig,
    reference: &Language,
    integer: IntegerWidth,
) -> CodegenResult<TokenStream> {
    let name = ident(&sig.method)?;
    let params = sig
        .arguments
        .iter()
        .map(|argument| signature_param(argument, sig, reference, integer))
        .collect::<CodegenResult<Vec<_>>>()?;
    let doc = format!(" Renders the `{}` message.", sig.message);
    Ok(quote! {
        #[doc = #doc]
        fn #name(&self, #(#params),*) -> String;
    })
}

fn signature_param(
    argument: &Argument,
    sig: &MethodSig,
    reference: &Language,
    integer: IntegerWidth,
) -> CodegenResult<TokenStream> {
    let raw = naming::parameter_name(&argument.name).map_err(|kind| {
        CodegenError::from(SchemaError::new(
            Location::language(reference.as_str()).message(&sig.message),
            kind,
        ))
    })?;
    let name = ident(&raw)?;
    let ty = param_type(&argument.ty, integer)?;
    Ok(quote! { #name: #ty })
}

fn param_list(params: &[Param], integer: IntegerWidth) -> CodegenResult<Vec<TokenStream>> {
    params
        .iter()
        .map(|param| {
            let name = if param.used {
                ident(&param.binding.ident)?
            } else {
                ident(&format!("_{}", param.binding.ident))?
            };
            let ty = param_type(&param.ty, integer)?;
            Ok(quote! { #name: #ty })
        })
        .collect()
}

fn op_tokens(op: &Op, buffer: Buffer) -> CodegenResult<TokenStream> {
    Ok(match op {
        Op::AppendLiteral(text) => quote! { out.push_str(#text); },
        Op::AppendArgument {
            binding, format, ..
        } => {
            let arg = ident(&binding.ident)?;
            match format {
                FormatOp::PassThrough => quote! { out.push_str(#arg); },
                FormatOp::IntegerToText => quote! { out.push_str(&#arg.to_string()); },
                FormatOp::FixedFloat { precision } => {
                    let pattern = format!("{{{arg}:.{precision}}}");
                    quote! { write!(out, #pattern).ok(); }
                }
                FormatOp::Pattern(spec) => {
                    let pattern = spec.pattern(&binding.ident);
                    quote! { write!(out, #pattern).ok(); }
                }
                FormatOp::Display => {
                    let pattern = format!("{{{arg}}}");
                    quote! { write!(out, #pattern).ok(); }
                }
            }
        }
        Op::CallVariable {
            function,
            arguments,
            ..
        } => {
            let callee = ident(function)?;
            let args = arguments
                .iter()
                .map(|binding| ident(&binding.ident))
                .collect::<CodegenResult<Vec<_>>>()?;
            match buffer {
                Buffer::Owned => quote! { Self::#callee(&mut out, #(#args),*); },
                Buffer::Borrowed => quote! { Self::#callee(out, #(#args),*); },
            }
        }
        Op::ReturnConstant(text) => quote! { return #text.to_owned(); },
    })
}

fn sequence(lowered: &LoweredParts, buffer: Buffer) -> CodegenResult<TokenStream> {
    let ops = lowered
        .ops
        .iter()
        .map(|op| op_tokens(op, buffer))
        .collect::<CodegenResult<Vec<_>>>()?;
    Ok(quote! { #(#ops)* })
}

fn pattern(condition: Condition) -> TokenStream {
    match condition {
        Condition::Equals(value) => {
            let lit = Literal::u8_unsuffixed(value);
            quote! { #lit }
        }
        Condition::GreaterThan(value) => {
            let lit = Literal::u16_unsuffixed(u16::from(value) + 1);
            quote! { #lit.. }
        }
        Condition::Otherwise => quote! { _ },
    }
}

fn match_tokens<F>(
    dispatch: &Dispatch,
    mut arm: F,
    fallback: &TokenStream,
) -> CodegenResult<TokenStream>
where
    F: FnMut(&LoweredParts) -> CodegenResult<TokenStream>,
{
    let driver = ident(&dispatch.driver.ident)?;
    let mut arms = Vec::with_capacity(dispatch.branches.len() + 1);
    for branch in dispatch.live_branches() {
        let pat = pattern(branch.condition);
        let body = arm(&branch.body)?;
        arms.push(quote! { #pat => #body, });
    }
    if dispatch.needs_fallback() {
        arms.push(quote! { _ => #fallback, });
    }
    Ok(quote! {
        match #driver {
            #(#arms)*
        }
    })
}

fn accumulate_arm(buffer: Buffer) -> impl FnMut(&LoweredParts) -> CodegenResult<TokenStream> {
    move |body| {
        let ops = sequence(body, buffer)?;
        Ok(quote! { { #ops } })
    }
}

fn constant_expr(body: &LoweredParts) -> TokenStream {
    let text = body.constant().unwrap_or_default();
    quote! { #text.to_owned() }
}

fn flow_is_constant(flow: &Flow) -> bool {
    match flow {
        Flow::Sequence(parts) => parts.constant().is_some(),
        Flow::Dispatch(dispatch) => dispatch.is_constant(),
    }
}

fn flow_writes(flow: &Flow) -> bool {
    match flow {
        Flow::Sequence(parts) => !parts.ops.is_empty(),
        Flow::Dispatch(dispatch) => dispatch
            .live_branches()
            .any(|branch| !branch.body.ops.is_empty()),
    }
}

/// Trait method implementation for a message.
pub(super) fn message_method(
    function: &Function,
    integer: IntegerWidth,
) -> CodegenResult<TokenStream> {
    let name = ident(&function.name)?;
    let params = param_list(&function.params, integer)?;
    let simple = function.shape == Shape::Simple && flow_is_constant(&function.flow);
    let body = match (&function.flow, simple) {
        (Flow::Sequence(parts), true) => constant_expr(parts),
        (Flow::Dispatch(dispatch), true) => {
            match_tokens(dispatch, |body| Ok(constant_expr(body)), &quote! { String::new() })?
        }
        (Flow::Sequence(parts), false) => {
            let ops = sequence(parts, Buffer::Owned)?;
            quote! {
                let mut out = String::new();
                #ops
                out
            }
        }
        (Flow::Dispatch(dispatch), false) => {
            let branches = match_tokens(dispatch, accumulate_arm(Buffer::Owned), &quote! { {} })?;
            quote! {
                let mut out = String::new();
                #branches
                out
            }
        }
    };
    Ok(quote! {
        fn #name(&self, #(#params),*) -> String {
            #body
        }
    })
}

/// Associated function writing a variable into the caller's buffer.
pub(super) fn auxiliary_method(
    function: &Function,
    integer: IntegerWidth,
) -> CodegenResult<TokenStream> {
    let name = ident(&function.name)?;
    let params = param_list(&function.params, integer)?;
    let buffer = if flow_writes(&function.flow) {
        quote! { out }
    } else {
        quote! { _out }
    };
    let body = match &function.flow {
        Flow::Sequence(parts) => sequence(parts, Buffer::Borrowed)?,
        Flow::Dispatch(dispatch) => {
            match_tokens(dispatch, accumulate_arm(Buffer::Borrowed), &quote! { {} })?
        }
    };
    Ok(quote! {
        fn #name(#buffer: &mut String, #(#params),*) {
            #body
        }
    })
}
