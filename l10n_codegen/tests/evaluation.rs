//! Behaviour of compiled messages, checked through the interpreter.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(clippy::expect_used, reason = "tests panic to surface broken fixtures")]

use anyhow::Result;
use l10n_codegen::ir::{
    FormatParts, Localization, MessageScope, Plural, PluralCategory, SemanticType, Template,
    VariableScope,
};
use l10n_codegen::{CodegenConfig, Compiled, Compiler, EvalError, IntegerWidth, Value};
use rstest::{fixture, rstest};

fn items() -> MessageScope {
    MessageScope::new("items")
        .with_argument("count", SemanticType::Integer)
        .with_template(Template::Plural(
            Plural::new("count")
                .with(PluralCategory::Zero, FormatParts::new().literal("No items"))
                .with(
                    PluralCategory::One,
                    FormatParts::new().literal("One item").variable("total"),
                )
                .with(
                    PluralCategory::Many,
                    FormatParts::new()
                        .argument("count")
                        .literal(" items")
                        .variable("total"),
                )
                .with(
                    PluralCategory::Other,
                    FormatParts::new().argument("count").literal(" items"),
                ),
        ))
        .with_variable(
            VariableScope::new("total")
                .with_argument("count")
                .with_template(Template::Plain(
                    FormatParts::new().literal(" (total ").argument("count").literal(")"),
                )),
        )
}

fn inbox(language: &str, greeting: &str) -> Localization {
    Localization::new(language)
        .with_scope(
            MessageScope::new("greeting")
                .with_argument("name", SemanticType::Text)
                .with_template(Template::Plain(
                    FormatParts::new().literal(greeting).argument("name"),
                )),
        )
        .with_scope(
            MessageScope::new("title").with_template(Template::Plain(
                FormatParts::new().literal("Inbox"),
            )),
        )
        .with_scope(
            MessageScope::new("balance")
                .with_argument("amount", SemanticType::Float)
                .with_argument("code", SemanticType::Integer)
                .with_template(Template::Plain(
                    FormatParts::new()
                        .argument("amount")
                        .literal(" / ")
                        .formatted("code", "#06x"),
                )),
        )
        .with_scope(items())
}

#[fixture]
fn compiled() -> Compiled {
    Compiler::new(CodegenConfig::default())
        .compile(&[inbox("en", "Hello, "), inbox("fr", "Bonjour, ")])
        .expect("inbox definitions compile")
}

#[rstest]
fn substitutes_arguments_in_order(compiled: Compiled) -> Result<()> {
    let args = [("name", Value::from("Ada"))];
    assert_eq!(compiled.evaluate("en", "greeting", &args)?, "Hello, Ada");
    assert_eq!(compiled.evaluate("fr", "greeting", &args)?, "Bonjour, Ada");
    Ok(())
}

#[rstest]
fn literal_messages_are_constant(compiled: Compiled) -> Result<()> {
    assert_eq!(compiled.evaluate("en", "title", &[])?, "Inbox");
    Ok(())
}

#[rstest]
#[case(0, "No items")]
#[case(1, "One item (total 1)")]
#[case(2, "2 items (total 2)")]
#[case(5, "5 items (total 5)")]
#[case(-3, "-3 items")]
fn plural_branches_follow_the_count(
    compiled: Compiled,
    #[case] count: i64,
    #[case] expected: &str,
) -> Result<()> {
    let text = compiled.evaluate("en", "items", &[("count", Value::from(count))])?;
    assert_eq!(text, expected);
    Ok(())
}

#[rstest]
fn floats_and_directives_are_formatted(compiled: Compiled) -> Result<()> {
    let args = [("amount", Value::from(2.5)), ("code", Value::from(255))];
    assert_eq!(compiled.evaluate("en", "balance", &args)?, "2.500000 / 0x00ff");
    Ok(())
}

#[rstest]
fn argument_errors_are_reported(compiled: Compiled) {
    assert!(matches!(
        compiled.evaluate("en", "greeting", &[]),
        Err(EvalError::MissingArgument { .. })
    ));
    assert!(matches!(
        compiled.evaluate("en", "greeting", &[("name", Value::from(1))]),
        Err(EvalError::ArgumentType { .. })
    ));
    assert!(matches!(
        compiled.evaluate("en", "title", &[("name", Value::from("x"))]),
        Err(EvalError::UnexpectedArgument { .. })
    ));
    assert!(matches!(
        compiled.evaluate("en", "farewell", &[]),
        Err(EvalError::UnknownMessage { .. })
    ));
}

#[rstest]
fn unsigned_counts_may_omit_other() -> Result<()> {
    let plural = Plural::new("count")
        .with(PluralCategory::Zero, FormatParts::new().literal("none"))
        .with(PluralCategory::One, FormatParts::new().literal("one"))
        .with(PluralCategory::Many, FormatParts::new().argument("count"));
    let localization = Localization::new("en").with_scope(
        MessageScope::new("count")
            .with_argument("count", SemanticType::Integer)
            .with_template(Template::Plural(plural)),
    );
    let config = CodegenConfig {
        integer: IntegerWidth::U64,
        ..CodegenConfig::default()
    };
    let compiled = Compiler::new(config).compile(&[localization])?;
    assert_eq!(compiled.evaluate("en", "count", &[("count", Value::from(0))])?, "none");
    assert_eq!(compiled.evaluate("en", "count", &[("count", Value::from(7))])?, "7");
    assert_eq!(
        compiled.evaluate("en", "count", &[("count", Value::from(u64::MAX))])?,
        u64::MAX.to_string()
    );
    assert_eq!(
        compiled.evaluate("en", "count", &[("count", Value::from(-1))]),
        Err(EvalError::IntegerOutOfRange {
            message: "count".to_owned(),
            argument: "count".to_owned(),
            value: -1,
            width: "u64",
        })
    );
    Ok(())
}

#[rstest]
fn signed_counts_reject_values_beyond_i64() -> Result<()> {
    let compiled =
        Compiler::new(CodegenConfig::default()).compile(&[Localization::new("en").with_scope(items())])?;
    let err = compiled
        .evaluate("en", "items", &[("count", Value::from(u64::MAX))])
        .expect_err("u64::MAX does not fit i64");
    assert_eq!(
        err.to_string(),
        format!("argument 'count' of 'items' does not fit i64: {}", u64::MAX)
    );
    Ok(())
}
