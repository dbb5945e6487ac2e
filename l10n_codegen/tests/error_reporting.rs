//! Schema violations are collected across languages and reported together.

use l10n_codegen::ir::{
    FormatParts, Localization, MessageScope, Plural, PluralCategory, SemanticType, Template,
    VariableScope,
};
use l10n_codegen::{CodegenConfig, CodegenError, Compiler, SchemaErrorKind};
use rstest::rstest;

fn plain(name: &str, parts: FormatParts) -> MessageScope {
    MessageScope::new(name).with_template(Template::Plain(parts))
}

fn compile_err(localizations: &[Localization]) -> CodegenError {
    match Compiler::new(CodegenConfig::default()).compile(localizations) {
        Ok(_) => panic!("compilation should fail"),
        Err(err) => err,
    }
}

fn kinds(err: &CodegenError) -> Vec<SchemaErrorKind> {
    err.schema_errors()
        .into_iter()
        .map(|error| error.kind.clone())
        .collect()
}

#[rstest]
fn aggregates_violations_from_every_language() {
    let en = Localization::new("en")
        .with_scope(plain("greeting", FormatParts::new().argument("name")))
        .with_scope(MessageScope::new("title"));
    let fr = Localization::new("fr").with_scope(plain(
        "greeting",
        FormatParts::new().variable("salutation"),
    ));
    let err = compile_err(&[en, fr]);
    let CodegenError::Aggregate(all) = &err else {
        panic!("expected an aggregate error, got {err:?}");
    };
    assert_eq!(all.len(), 3);
    assert_eq!(
        kinds(&err),
        vec![
            SchemaErrorKind::UnknownArgument("name".to_owned()),
            SchemaErrorKind::UnsetTemplate,
            SchemaErrorKind::UnknownVariable("salutation".to_owned()),
        ]
    );
}

#[rstest]
fn locations_name_language_message_and_variable() {
    let scope = MessageScope::new("items")
        .with_argument("count", SemanticType::Integer)
        .with_template(Template::Plain(FormatParts::new().variable("total")))
        .with_variable(
            VariableScope::new("total")
                .with_template(Template::Plain(FormatParts::new().argument("count"))),
        );
    let err = compile_err(&[Localization::new("en").with_scope(scope)]);
    assert_eq!(
        err.to_string(),
        "language 'en', message 'items', variable 'total': argument 'count' is not passed to \
         this variable"
    );
}

#[rstest]
fn cycles_between_variables_are_rejected() {
    let scope = plain("cycle", FormatParts::new().variable("a"))
        .with_variable(
            VariableScope::new("a").with_template(Template::Plain(FormatParts::new().variable("b"))),
        )
        .with_variable(
            VariableScope::new("b").with_template(Template::Plain(FormatParts::new().variable("a"))),
        );
    let err = compile_err(&[Localization::new("en").with_scope(scope)]);
    assert!(
        kinds(&err)
            .iter()
            .any(|kind| matches!(kind, SchemaErrorKind::VariableCycle(_)))
    );
}

#[rstest]
#[case::signed_without_other(
    Plural::new("count").with(PluralCategory::One, FormatParts::new().literal("one")),
    SemanticType::Integer,
    SchemaErrorKind::MissingOtherBranch("count".to_owned())
)]
#[case::text_driver(
    Plural::new("count").with(PluralCategory::Other, FormatParts::new().literal("n")),
    SemanticType::Text,
    SchemaErrorKind::PluralArgumentNotInteger {
        name: "count".to_owned(),
        found: "text".to_owned(),
    }
)]
#[case::no_branches(Plural::new("count"), SemanticType::Integer, SchemaErrorKind::EmptyPlural)]
fn plural_rules_are_enforced(
    #[case] plural: Plural,
    #[case] ty: SemanticType,
    #[case] expected: SchemaErrorKind,
) {
    let scope = MessageScope::new("items")
        .with_argument("count", ty)
        .with_template(Template::Plural(plural));
    let err = compile_err(&[Localization::new("en").with_scope(scope)]);
    assert_eq!(kinds(&err), vec![expected]);
}

#[rstest]
fn languages_must_share_the_contract() {
    let en = Localization::new("en").with_scope(plain("title", FormatParts::new().literal("T")));
    let de = Localization::new("de")
        .with_scope(plain("title", FormatParts::new().literal("T")))
        .with_scope(plain("extra", FormatParts::new().literal("E")));
    let err = compile_err(&[en, de]);
    assert_eq!(
        err.to_string(),
        "language 'de', message 'extra': message is not declared by the reference language 'en'"
    );
}
