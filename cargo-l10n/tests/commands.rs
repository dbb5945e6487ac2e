//! End-to-end tests for the `generate`, `check` and `preview` commands,
//! through the library and through the binary.

mod common;

use std::process;

use anyhow::{Result, ensure};
use cargo_l10n::cli::{Command, GenerateArgs, PreviewArgs};
use cargo_l10n::error::L10nError;
use cargo_l10n::{Outcome, run};
use rstest::rstest;
use test_helpers::text::{normalize_tokens, strip_header};

use common::{cargo_l10n_exe, inbox, source};

#[rstest]
fn generate_writes_one_file_per_language() -> Result<()> {
    let dir = inbox()?;
    let output = dir.path().join("out");
    let outcome = run(&Command::Generate(GenerateArgs {
        source: source(&dir),
        output: output.clone(),
    }))?;
    ensure!(
        outcome
            == Outcome::Generated(vec![
                output.join("mod.rs"),
                output.join("de.rs"),
                output.join("en.rs"),
            ]),
        "unexpected outcome {outcome:?}"
    );

    let general = dir.read("out/mod.rs")?;
    ensure!(general.starts_with("// Code generated by cargo-l10n; DO NOT EDIT.\n"));
    let tokens = normalize_tokens(strip_header(&general));
    ensure!(tokens.contains("pubconstSUPPORTED:&[&str]=&[\"de\",\"en\"];"), "{tokens}");
    for file in ["out/mod.rs", "out/de.rs", "out/en.rs"] {
        let contents = dir.read(file)?;
        ensure!(syn::parse_file(&contents).is_ok(), "{file} does not parse");
    }
    ensure!(normalize_tokens(&dir.read("out/de.rs")?).contains("\"Posteingang\""));
    Ok(())
}

#[rstest]
fn check_reports_counts() -> Result<()> {
    let dir = inbox()?;
    let outcome = run(&Command::Check(source(&dir)))?;
    ensure!(
        outcome
            == Outcome::Checked {
                languages: 2,
                messages: 3,
            }
    );
    ensure!(outcome.to_string() == "ok: 2 languages, 3 messages");
    Ok(())
}

#[rstest]
#[case(None, &["count=0", "folder=Spam"], "Keine Nachrichten")]
#[case(Some("en"), &["count=1", "folder=Spam"], "One message in Spam")]
#[case(Some("en"), &["folder=Work", "count=7"], "7 messages in Work")]
fn preview_renders_messages(
    #[case] lang: Option<&str>,
    #[case] args: &[&str],
    #[case] expected: &str,
) -> Result<()> {
    let dir = inbox()?;
    let outcome = run(&Command::Preview(PreviewArgs {
        source: source(&dir),
        lang: lang.map(str::to_owned),
        message: "items".to_owned(),
        args: args.iter().map(|arg| (*arg).to_owned()).collect(),
    }))?;
    ensure!(outcome == Outcome::Preview(expected.to_owned()), "{outcome:?}");
    Ok(())
}

#[rstest]
fn check_aggregates_errors_across_languages() -> Result<()> {
    let dir = inbox()?;
    dir.write("broken.fr.yaml", "title: \"{oops\"\n")?;
    dir.write("extra.de.toml", "title = \"Doppelt\"\n")?;
    let Err(err) = run(&Command::Check(source(&dir))) else {
        anyhow::bail!("broken definitions compiled");
    };
    let L10nError::Aggregate(errors) = &err else {
        anyhow::bail!("expected an aggregate, got {err}");
    };
    ensure!(errors.len() == 2, "{err}");
    let report = err.to_string();
    ensure!(report.contains("message 'title' is declared more than once"), "{report}");
    ensure!(report.contains("unclosed '{' at offset 0"), "{report}");
    Ok(())
}

#[rstest]
fn pattern_flag_selects_definition_files() -> Result<()> {
    let dir = inbox()?;
    dir.write("strings-pt-BR.yaml", "title: Caixa de entrada\ngreeting: \"Olá, {name:s}\"\n")?;
    let mut args = source(&dir);
    args.pattern = Some(r"(\w+)-([a-z]{2}-[A-Z]{2})\.(yaml)".to_owned());
    let outcome = run(&Command::Preview(PreviewArgs {
        source: args.clone(),
        lang: None,
        message: "title".to_owned(),
        args: Vec::new(),
    }))?;
    ensure!(outcome == Outcome::Preview("Caixa de entrada".to_owned()), "{outcome:?}");

    args.pattern = Some("(inbox)\\.(xx)\\.(yaml)".to_owned());
    let err = run(&Command::Check(args)).err();
    ensure!(matches!(err, Some(L10nError::NoDefinitions(_))), "{err:?}");
    Ok(())
}

#[rstest]
fn missing_definitions_are_reported() -> Result<()> {
    let dir = test_helpers::fs::DefinitionDir::new()?;
    let err = run(&Command::Check(source(&dir))).err();
    ensure!(matches!(err, Some(L10nError::NoDefinitions(_))));
    Ok(())
}

#[rstest]
#[case(&["l10n", "preview"])]
#[case(&["preview"])]
fn binary_prints_preview_to_stdout(#[case] prefix: &[&str]) -> Result<()> {
    let dir = inbox()?;
    let output = process::Command::new(cargo_l10n_exe()?)
        .args(prefix)
        .args(["--input", dir.path().as_str(), "--lang", "en", "greeting", "name=Ada"])
        .output()?;
    ensure!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    ensure!(String::from_utf8(output.stdout)? == "Hello, Ada\n");
    Ok(())
}

#[rstest]
fn binary_failures_exit_non_zero_with_a_message() -> Result<()> {
    let dir = inbox()?;
    let output = process::Command::new(cargo_l10n_exe()?)
        .args(["check", "--input", dir.path().join("missing").as_str()])
        .output()?;
    ensure!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    ensure!(stderr.contains("error: no definition files found in"), "{stderr}");
    Ok(())
}
