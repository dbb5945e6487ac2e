//! End-to-end compilation.
//!
//! [`Compiler::compile`] validates every localisation, lowers each one
//! independently and unifies them into one contract. Nothing is produced when
//! any step fails; every failure found is reported in one aggregate error.

use crate::config::CodegenConfig;
use crate::emit::{Emitter, GeneratedFile, RustEmitter};
use crate::error::{self, CodegenError, CodegenResult};
use crate::eval::{EvalError, Evaluator, Value};
use crate::ir::Localization;
use crate::lower::{self, LoweredLocalization};
use crate::unify::{self, Unified};
use crate::validate;

/// Compiles localisations with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CodegenConfig,
}

impl Compiler {
    /// Creates a compiler for `config`.
    #[must_use]
    pub const fn new(config: CodegenConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Validates, lowers and unifies `localizations`.
    ///
    /// Schema validation runs first for every language. When it passes, each
    /// language is lowered and the set is unified; failures from both steps
    /// are reported together.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::NoLocalizations`] for an empty input, a single
    /// error when exactly one problem was found and
    /// [`CodegenError::Aggregate`] otherwise.
    pub fn compile(&self, localizations: &[Localization]) -> CodegenResult<Compiled> {
        if localizations.is_empty() {
            return Err(CodegenError::NoLocalizations);
        }
        error::collect(validate::validate_all(localizations, self.config.integer))?;

        let mut errors = Vec::new();
        let mut units = Vec::with_capacity(localizations.len());
        for localization in localizations {
            match lower::lower_localization(localization, &self.config) {
                Ok(unit) => {
                    tracing::info!(
                        language = %unit.language,
                        messages = unit.messages.len(),
                        auxiliaries = unit.auxiliaries.len(),
                        dependencies = unit.dependencies.len(),
                        "compiled localization"
                    );
                    units.push(unit);
                }
                Err(err) => errors.push(err),
            }
        }
        let unified = match unify::unify(localizations) {
            Ok(unified) => Some(unified),
            Err(err) => {
                errors.push(err);
                None
            }
        };
        if let Some(err) = CodegenError::try_aggregate(errors) {
            return Err(err);
        }
        let Some(unified) = unified else {
            return Err(CodegenError::NoLocalizations);
        };
        Ok(Compiled {
            unified,
            units,
            config: self.config.clone(),
        })
    }
}

/// Output of a successful compilation.
#[derive(Debug, Clone)]
pub struct Compiled {
    unified: Unified,
    units: Vec<LoweredLocalization>,
    config: CodegenConfig,
}

impl Compiled {
    /// Shared contract and registry.
    #[must_use]
    pub const fn unified(&self) -> &Unified {
        &self.unified
    }

    /// Lowered units in registration order.
    #[must_use]
    pub fn units(&self) -> &[LoweredLocalization] {
        &self.units
    }

    /// Supported language identifiers in registration order.
    pub fn supported(&self) -> impl Iterator<Item = &str> {
        self.unified.registry.identifiers()
    }

    /// Returns the lowered unit for `language`, or `None` when it is not
    /// registered.
    #[must_use]
    pub fn localizer(&self, language: &str) -> Option<&LoweredLocalization> {
        self.units
            .iter()
            .find(|unit| unit.language.as_str() == language)
    }

    /// Returns the identifier of `unit`, or `""` when it does not belong to
    /// this compilation.
    #[must_use]
    pub fn language_of(&self, unit: &LoweredLocalization) -> &str {
        self.units
            .iter()
            .find(|candidate| std::ptr::eq(*candidate, unit))
            .map_or("", |candidate| candidate.language.as_str())
    }

    /// Evaluator for `language`.
    #[must_use]
    pub fn evaluator(&self, language: &str) -> Option<Evaluator<'_>> {
        self.localizer(language)
            .map(|unit| Evaluator::new(unit, self.config.integer))
    }

    /// Renders `message` of `language` with named argument values.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownLanguage`] for unregistered languages and
    /// any error raised by [`Evaluator::evaluate`].
    pub fn evaluate(
        &self,
        language: &str,
        message: &str,
        args: &[(&str, Value)],
    ) -> Result<String, EvalError> {
        self.evaluator(language)
            .ok_or_else(|| EvalError::UnknownLanguage(language.to_owned()))?
            .evaluate(message, args)
    }

    /// Renders every unit with `emitter`, general unit first.
    ///
    /// # Errors
    ///
    /// Returns every rendering failure, aggregated.
    pub fn emit<E: Emitter>(&self, emitter: &E) -> CodegenResult<Vec<E::Output>> {
        let mut outputs = Vec::with_capacity(self.units.len() + 1);
        let mut errors = Vec::new();
        match emitter.general(&self.unified) {
            Ok(output) => outputs.push(output),
            Err(err) => errors.push(err),
        }
        for (entry, unit) in self.unified.registry.entries().iter().zip(&self.units) {
            match emitter.localization(&self.unified, entry, unit) {
                Ok(output) => outputs.push(output),
                Err(err) => errors.push(err),
            }
        }
        CodegenError::try_aggregate(errors).map_or(Ok(outputs), Err)
    }

    /// Renders Rust source files with [`RustEmitter`].
    ///
    /// # Errors
    ///
    /// Returns every rendering failure, aggregated.
    pub fn render(&self) -> CodegenResult<Vec<GeneratedFile>> {
        self.emit(&RustEmitter::new(self.config.clone()))
    }
}

/// Compiles `localizations` and renders Rust sources in one step.
///
/// # Errors
///
/// Returns the errors of [`Compiler::compile`] and [`Compiled::render`].
pub fn compile(
    localizations: &[Localization],
    config: CodegenConfig,
) -> CodegenResult<Vec<GeneratedFile>> {
    Compiler::new(config).compile(localizations)?.render()
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface broken fixtures")]
mod tests {
    use super::*;
    use crate::ir::{FormatParts, MessageScope, SemanticType, Template};
    use anyhow::{Result, anyhow, ensure};
    use rstest::{fixture, rstest};

    fn greeting(language: &str, text: &str) -> Localization {
        Localization::new(language).with_scope(
            MessageScope::new("greeting")
                .with_argument("name", SemanticType::Text)
                .with_template(Template::Plain(
                    FormatParts::new().literal(text).argument("name"),
                )),
        )
    }

    #[fixture]
    fn compiled() -> Compiled {
        Compiler::default()
            .compile(&[greeting("en", "Hello, "), greeting("fr", "Bonjour, ")])
            .expect("definitions compile")
    }

    #[rstest]
    fn looks_up_units_by_identifier(compiled: Compiled) -> Result<()> {
        let fr = compiled.localizer("fr").ok_or_else(|| anyhow!("fr missing"))?;
        ensure!(compiled.language_of(fr) == "fr");
        ensure!(compiled.localizer("de").is_none());
        ensure!(compiled.supported().collect::<Vec<_>>() == vec!["en", "fr"]);
        Ok(())
    }

    #[rstest]
    fn foreign_unit_has_no_identifier(compiled: Compiled) -> Result<()> {
        let foreign = compiled
            .localizer("en")
            .cloned()
            .ok_or_else(|| anyhow!("en missing"))?;
        ensure!(compiled.language_of(&foreign).is_empty());
        Ok(())
    }

    #[rstest]
    fn evaluates_per_language(compiled: Compiled) -> Result<()> {
        let args = [("name", Value::from("Ada"))];
        ensure!(compiled.evaluate("en", "greeting", &args)? == "Hello, Ada");
        ensure!(compiled.evaluate("fr", "greeting", &args)? == "Bonjour, Ada");
        ensure!(matches!(
            compiled.evaluate("de", "greeting", &args),
            Err(EvalError::UnknownLanguage(_))
        ));
        Ok(())
    }

    #[rstest]
    fn renders_general_unit_first(compiled: Compiled) -> Result<()> {
        let files = compiled.render()?;
        let names: Vec<_> = files.iter().map(|file| file.name.as_str()).collect();
        ensure!(names == vec!["mod.rs", "en.rs", "fr.rs"]);
        Ok(())
    }

    #[rstest]
    fn empty_input_is_rejected() {
        assert!(matches!(
            Compiler::default().compile(&[]),
            Err(CodegenError::NoLocalizations)
        ));
    }

    #[rstest]
    fn reports_schema_errors_from_every_language() {
        let broken = |language: &str| {
            Localization::new(language).with_scope(MessageScope::new("greeting"))
        };
        let err = Compiler::default()
            .compile(&[broken("en"), broken("fr")])
            .expect_err("unset templates are rejected");
        assert_eq!(err.schema_errors().len(), 2);
    }
}
