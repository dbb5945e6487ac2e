//! Builds compiler IR from parsed definition documents.
//!
//! Placeholders declare arguments as they are used; a message's argument
//! list is its `args` table entry when present and every declared argument
//! in name order otherwise. A variable receives exactly the arguments it
//! uses, directly or through the variables it references, in the message's
//! order.

pub mod document;
pub mod template;

use std::collections::{BTreeMap, BTreeSet};

use camino::Utf8Path;
use l10n_codegen::ir::{
    FormatParts, Localization, MessageScope, Plural, PluralCategory, SemanticType, Template,
    VariableScope,
};
use l10n_codegen::{CodegenError, Location, SchemaError, SchemaErrorKind};
use serde_json::{Map, Value};

use crate::config::Specifiers;
use crate::error::L10nError;
use document::{Document, Entry, Table};
use template::Token;

/// Builds one localisation from the documents of a language.
///
/// Messages keep document order; documents are taken in the order given.
///
/// # Errors
///
/// Returns every definition, template and duplicate-message error found,
/// aggregated.
pub fn build_localization(
    language: &str,
    documents: &[Document],
    specifiers: &Specifiers,
) -> Result<Localization, L10nError> {
    let mut localization = Localization::new(language);
    let mut errors = Vec::new();
    let mut seen = BTreeSet::new();
    for document in documents {
        for (name, entry) in &document.messages {
            if !seen.insert(name.as_str()) {
                errors.push(schema_error(
                    Location::language(language).message(name),
                    SchemaErrorKind::DuplicateMessage(name.clone()),
                ));
                continue;
            }
            let builder = MessageBuilder::new(language, &document.path, name, specifiers);
            match builder.build(entry) {
                Ok(scope) => localization.scopes.push(scope),
                Err(found) => errors.extend(found),
            }
        }
    }
    if let Some(err) = L10nError::try_aggregate(errors) {
        return Err(err);
    }
    tracing::debug!(
        %language,
        messages = localization.scopes.len(),
        documents = documents.len(),
        "built localization"
    );
    Ok(localization)
}

fn schema_error(location: Location, kind: SchemaErrorKind) -> L10nError {
    L10nError::Codegen(CodegenError::from(SchemaError::new(location, kind)))
}

struct MessageBuilder<'a> {
    language: &'a str,
    path: &'a Utf8Path,
    message: &'a str,
    specifiers: &'a Specifiers,
    declared: BTreeMap<String, SemanticType>,
    errors: Vec<L10nError>,
}

impl<'a> MessageBuilder<'a> {
    const fn new(
        language: &'a str,
        path: &'a Utf8Path,
        message: &'a str,
        specifiers: &'a Specifiers,
    ) -> Self {
        Self {
            language,
            path,
            message,
            specifiers,
            declared: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    fn build(mut self, entry: &Entry) -> Result<MessageScope, Vec<L10nError>> {
        let empty = Map::new();
        let (template, listed, vars) = match entry {
            Entry::Text(text) => (Template::Plain(self.parts(text)), None, &empty),
            Entry::Table(table) => {
                let listed = self.listed(&table.args);
                (self.table(table, None), listed, &table.vars)
            }
        };
        let variables = self.variables(vars);
        let order = self.order(listed);

        let mut scope = MessageScope::new(self.message).with_template(template);
        for name in &order {
            if let Some(ty) = self.declared.get(name) {
                scope = scope.with_argument(name.clone(), ty.clone());
            }
        }
        for (name, template) in &variables {
            let mut variable = VariableScope::new(name.clone());
            for argument in received(&variables, name, &order) {
                variable = variable.with_argument(argument);
            }
            scope = scope.with_variable(variable.with_template(template.clone()));
        }
        if self.errors.is_empty() {
            Ok(scope)
        } else {
            Err(self.errors)
        }
    }

    fn definition(&mut self, reason: String) {
        self.errors.push(L10nError::Definition {
            path: self.path.to_path_buf(),
            message: self.message.to_owned(),
            reason,
        });
    }

    fn declare(&mut self, name: &str, spec: char) {
        let Some(ty) = self.specifiers.get(spec).cloned() else {
            self.definition(format!("unknown specifier '{spec}' for argument '{name}'"));
            return;
        };
        match self.declared.get(name) {
            Some(existing) if *existing != ty => {
                let reason = format!("argument '{name}' is declared as both {existing} and {ty}");
                self.definition(reason);
            }
            Some(_) => {}
            None => {
                self.declared.insert(name.to_owned(), ty);
            }
        }
    }

    /// Declares the `args` list and returns its names in order, or `None`
    /// when the list is empty.
    fn listed(&mut self, args: &[String]) -> Option<Vec<String>> {
        if args.is_empty() {
            return None;
        }
        let mut names = Vec::with_capacity(args.len());
        for raw in args {
            match split_spec(raw) {
                Some((name, Some(spec))) => {
                    self.declare(name, spec);
                    names.push(name.to_owned());
                }
                _ => self.definition(format!("'{raw}' in 'args' must be written as name:spec")),
            }
        }
        Some(names)
    }

    fn order(&mut self, listed: Option<Vec<String>>) -> Vec<String> {
        let Some(names) = listed else {
            return self.declared.keys().cloned().collect();
        };
        let unlisted: Vec<String> = self
            .declared
            .keys()
            .filter(|name| !names.contains(name))
            .cloned()
            .collect();
        for name in unlisted {
            self.definition(format!("argument '{name}' is used but not listed in 'args'"));
        }
        names
    }

    fn parts(&mut self, text: &str) -> FormatParts {
        let tokens = match template::parse(text) {
            Ok(tokens) => tokens,
            Err(source) => {
                self.errors.push(L10nError::Template {
                    path: self.path.to_path_buf(),
                    message: self.message.to_owned(),
                    source,
                });
                return FormatParts::new();
            }
        };
        let mut parts = FormatParts::new();
        for token in tokens {
            parts = match token {
                Token::Literal(literal) => parts.literal(literal),
                Token::Argument {
                    name,
                    spec,
                    directive,
                } => {
                    if let Some(spec) = spec {
                        self.declare(&name, spec);
                    }
                    match directive {
                        Some(directive) => parts.formatted(name, directive),
                        None => parts.argument(name),
                    }
                }
                Token::Variable(name) => parts.variable(name),
            };
        }
        parts
    }

    fn table(&mut self, table: &Table, variable: Option<&str>) -> Template {
        match (&table.text, &table.plural) {
            (Some(_), Some(_)) => {
                let mut location = Location::language(self.language).message(self.message);
                if let Some(variable) = variable {
                    location = location.variable(variable);
                }
                self.errors.push(schema_error(
                    location,
                    SchemaErrorKind::ConflictingTemplates,
                ));
                Template::Unset
            }
            (Some(text), None) => {
                if table.has_branches() {
                    self.definition("plural branches need a 'plural' argument".to_owned());
                }
                Template::Plain(self.parts(text))
            }
            (None, Some(driver)) => Template::Plural(self.plural(driver, table)),
            (None, None) => {
                if table.has_branches() {
                    self.definition("plural branches need a 'plural' argument".to_owned());
                }
                Template::Unset
            }
        }
    }

    fn plural(&mut self, driver: &str, table: &Table) -> Plural {
        let argument = match split_spec(driver) {
            Some((name, spec)) => {
                if let Some(spec) = spec {
                    self.declare(name, spec);
                }
                name
            }
            None => {
                self.definition(format!("plural argument '{driver}' is malformed"));
                driver
            }
        };
        let mut plural = Plural::new(argument);
        for (category, body) in PluralCategory::ALL.into_iter().zip(table.branches()) {
            if let Some(body) = body {
                plural = plural.with(category, self.parts(body));
            }
        }
        plural
    }

    fn variables(&mut self, vars: &Map<String, Value>) -> Vec<(String, Template)> {
        let entries = match document::entries(self.path, vars.clone()) {
            Ok(entries) => entries,
            Err(err) => {
                self.errors.push(err);
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .map(|(name, entry)| {
                let template = match &entry {
                    Entry::Text(text) => Template::Plain(self.parts(text)),
                    Entry::Table(table) => {
                        if !table.args.is_empty() || !table.vars.is_empty() {
                            self.definition(format!(
                                "variable '{name}' cannot declare 'args' or 'vars'"
                            ));
                        }
                        self.table(table, Some(name.as_str()))
                    }
                };
                (name, template)
            })
            .collect()
    }
}

/// Splits `name` or `name:spec`. Returns `None` for an empty name or a
/// specifier that is not one character.
fn split_spec(raw: &str) -> Option<(&str, Option<char>)> {
    let (name, spec) = match raw.split_once(':') {
        Some((name, spec)) => {
            let mut chars = spec.trim().chars();
            match (chars.next(), chars.next()) {
                (Some(spec), None) => (name.trim(), Some(spec)),
                _ => return None,
            }
        }
        None => (raw.trim(), None),
    };
    (!name.is_empty()).then_some((name, spec))
}

/// Arguments `variable` uses directly or through other variables, in
/// message order.
fn received(variables: &[(String, Template)], variable: &str, order: &[String]) -> Vec<String> {
    let mut used = BTreeSet::new();
    let mut visited = BTreeSet::new();
    let mut pending = vec![variable];
    while let Some(next) = pending.pop() {
        if !visited.insert(next) {
            continue;
        }
        let Some((_, template)) = variables.iter().find(|(name, _)| name == next) else {
            continue;
        };
        used.extend(template.argument_refs());
        pending.extend(template.variable_refs());
    }
    order
        .iter()
        .filter(|name| used.contains(name.as_str()))
        .cloned()
        .collect()
}
