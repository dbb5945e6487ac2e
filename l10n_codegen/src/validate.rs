//! Schema checks run before lowering.
//!
//! Validation never stops at the first problem: every violation found in
//! every localisation is returned so a user can fix a definition set in one
//! pass.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::IntegerWidth;
use crate::error::{Location, SchemaError, SchemaErrorKind};
use crate::ir::{Localization, MessageScope, Part, Plural, PluralCategory, SemanticType, Template};
use crate::{naming, resolve};

/// Validates a set of localisations, including cross-language uniqueness.
#[must_use]
pub fn validate_all(localizations: &[Localization], integer: IntegerWidth) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut modules = BTreeSet::new();
    for localization in localizations {
        if let Ok(module) = naming::module_name(&localization.language) {
            if !modules.insert(module) {
                errors.push(SchemaError::new(
                    Location::language(localization.language.as_str()),
                    SchemaErrorKind::DuplicateLanguage,
                ));
                continue;
            }
        }
        errors.extend(validate(localization, integer));
    }
    errors
}

/// Validates one localisation.
#[must_use]
pub fn validate(localization: &Localization, integer: IntegerWidth) -> Vec<SchemaError> {
    let language = localization.language.as_str();
    let mut errors = Vec::new();
    let root = Location::language(language);
    for result in [
        naming::module_name(&localization.language),
        naming::type_name(&localization.language),
    ] {
        if let Err(kind) = result {
            errors.push(SchemaError::new(root.clone(), kind));
            break;
        }
    }

    let mut methods = BTreeSet::new();
    let mut auxiliaries = BTreeSet::new();
    for scope in &localization.scopes {
        let location = root.clone().message(&scope.name);
        match naming::method_name(&scope.name) {
            Ok(method) => {
                if !methods.insert(method) {
                    errors.push(SchemaError::new(
                        location.clone(),
                        SchemaErrorKind::DuplicateMessage(scope.name.clone()),
                    ));
                    continue;
                }
            }
            Err(kind) => errors.push(SchemaError::new(location.clone(), kind)),
        }
        for variable in &scope.variables {
            if let Ok(function) = naming::auxiliary_name(&scope.name, &variable.name) {
                if !auxiliaries.insert(function) {
                    errors.push(SchemaError::new(
                        location.clone().variable(&variable.name),
                        SchemaErrorKind::DuplicateVariable(variable.name.clone()),
                    ));
                }
            }
        }
        ScopeChecker::new(scope, location, integer, &mut errors).run();
    }
    errors
}

struct ScopeChecker<'a> {
    scope: &'a MessageScope,
    location: Location,
    integer: IntegerWidth,
    errors: &'a mut Vec<SchemaError>,
}

impl<'a> ScopeChecker<'a> {
    const fn new(
        scope: &'a MessageScope,
        location: Location,
        integer: IntegerWidth,
        errors: &'a mut Vec<SchemaError>,
    ) -> Self {
        Self {
            scope,
            location,
            integer,
            errors,
        }
    }

    fn report(&mut self, location: &Location, kind: SchemaErrorKind) {
        self.errors.push(SchemaError::new(location.clone(), kind));
    }

    fn run(&mut self) {
        let scope = self.scope;
        let location = self.location.clone();
        self.check_arguments();
        self.check_template(&location, &scope.template, None);

        let mut names = BTreeSet::new();
        for variable in &scope.variables {
            let var_location = location.clone().variable(&variable.name);
            if let Err(kind) = naming::auxiliary_name(&scope.name, &variable.name) {
                self.report(&var_location, kind);
            }
            if !names.insert(variable.name.as_str()) {
                self.report(
                    &var_location,
                    SchemaErrorKind::DuplicateVariable(variable.name.clone()),
                );
                continue;
            }
            let mut received = BTreeSet::new();
            for argument in &variable.arguments {
                if scope.argument(argument).is_none() {
                    self.report(
                        &var_location,
                        SchemaErrorKind::VariableArgumentNotInMessage(argument.clone()),
                    );
                }
                if !received.insert(argument.as_str()) {
                    self.report(
                        &var_location,
                        SchemaErrorKind::DuplicateArgument(argument.clone()),
                    );
                }
            }
            self.check_template(
                &var_location,
                &variable.template,
                Some(variable.arguments.as_slice()),
            );
        }

        for cycle in find_cycles(scope) {
            self.report(&location, SchemaErrorKind::VariableCycle(cycle.join(" -> ")));
        }
    }

    fn check_arguments(&mut self) {
        let scope = self.scope;
        let location = self.location.clone();
        let mut idents = BTreeSet::new();
        for argument in &scope.arguments {
            match naming::parameter_name(&argument.name) {
                Ok(ident) => {
                    if !idents.insert(ident) {
                        self.report(
                            &location,
                            SchemaErrorKind::DuplicateArgument(argument.name.clone()),
                        );
                    }
                }
                Err(kind) => self.report(&location, kind),
            }
            if let SemanticType::Custom(path) = &argument.ty {
                if syn::parse_str::<syn::Path>(path.as_str()).is_err() {
                    self.report(
                        &location,
                        SchemaErrorKind::InvalidTypePath(path.as_str().to_owned()),
                    );
                }
            }
        }
    }

    fn check_template(
        &mut self,
        location: &Location,
        template: &Template,
        visible: Option<&[String]>,
    ) {
        match template {
            Template::Unset => self.report(location, SchemaErrorKind::UnsetTemplate),
            Template::Plain(parts) => self.check_parts(location, parts.parts(), visible),
            Template::Plural(plural) => self.check_plural(location, plural, visible),
        }
    }

    fn check_plural(&mut self, location: &Location, plural: &Plural, visible: Option<&[String]>) {
        if plural.is_empty() {
            self.report(location, SchemaErrorKind::EmptyPlural);
            return;
        }
        if let Some(ty) = self.check_argument(location, &plural.argument, visible) {
            if !ty.is_integer() {
                self.report(
                    location,
                    SchemaErrorKind::PluralArgumentNotInteger {
                        name: plural.argument.clone(),
                        found: ty.to_string(),
                    },
                );
            }
        }
        if plural.other.is_none() && !self.explicitly_covered(plural) {
            self.report(
                location,
                SchemaErrorKind::MissingOtherBranch(plural.argument.clone()),
            );
        }
        for (_, parts) in plural.branches() {
            self.check_parts(location, parts.parts(), visible);
        }
    }

    fn explicitly_covered(&self, plural: &Plural) -> bool {
        self.integer.is_unsigned()
            && [PluralCategory::Zero, PluralCategory::One, PluralCategory::Many]
                .into_iter()
                .all(|category| plural.branch(category).is_some())
    }

    fn check_parts(&mut self, location: &Location, parts: &[Part], visible: Option<&[String]>) {
        let scope = self.scope;
        for part in parts {
            match part {
                Part::Literal(_) => {}
                Part::Argument { name, directive } => {
                    let Some(ty) = self.check_argument(location, name, visible) else {
                        continue;
                    };
                    if let Err(kind) = resolve::resolve(&ty, directive.as_ref()) {
                        self.report(location, kind);
                    }
                }
                Part::Variable(name) => {
                    let Some(callee) = scope.variable(name) else {
                        self.report(location, SchemaErrorKind::UnknownVariable(name.clone()));
                        continue;
                    };
                    let Some(visible) = visible else {
                        continue;
                    };
                    for argument in &callee.arguments {
                        if !visible.contains(argument) {
                            self.report(
                                location,
                                SchemaErrorKind::ArgumentNotInVariable(argument.clone()),
                            );
                        }
                    }
                }
            }
        }
    }

    /// Checks that `name` is declared and visible, returning its type.
    fn check_argument(
        &mut self,
        location: &Location,
        name: &str,
        visible: Option<&[String]>,
    ) -> Option<SemanticType> {
        let scope = self.scope;
        let Some(argument) = scope.argument(name) else {
            self.report(location, SchemaErrorKind::UnknownArgument(name.to_owned()));
            return None;
        };
        if let Some(visible) = visible {
            if !visible.iter().any(|candidate| candidate == name) {
                self.report(
                    location,
                    SchemaErrorKind::ArgumentNotInVariable(name.to_owned()),
                );
                return None;
            }
        }
        Some(argument.ty.clone())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Active,
    Done,
}

/// Variable reference cycles, each listed from its first repeated member.
fn find_cycles(scope: &MessageScope) -> Vec<Vec<&str>> {
    let mut state = BTreeMap::new();
    let mut cycles = Vec::new();
    for variable in &scope.variables {
        let mut path = Vec::new();
        visit(scope, &variable.name, &mut state, &mut path, &mut cycles);
    }
    cycles
}

fn visit<'s>(
    scope: &'s MessageScope,
    name: &'s str,
    state: &mut BTreeMap<&'s str, Visit>,
    path: &mut Vec<&'s str>,
    cycles: &mut Vec<Vec<&'s str>>,
) {
    match state.get(name) {
        Some(Visit::Done) => return,
        Some(Visit::Active) => {
            let start = path.iter().position(|step| *step == name).unwrap_or(0);
            let mut cycle = path.get(start..).unwrap_or_default().to_vec();
            cycle.push(name);
            cycles.push(cycle);
            return;
        }
        None => {}
    }
    let Some(variable) = scope.variable(name) else {
        return;
    };
    state.insert(name, Visit::Active);
    path.push(name);
    for next in variable.template.variable_refs() {
        visit(scope, next, state, path, cycles);
    }
    path.pop();
    state.insert(name, Visit::Done);
}
