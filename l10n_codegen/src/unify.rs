//! Derives the shared localizer contract and the language registry.
//!
//! The first localisation is the reference: its messages define the trait
//! every language implements. Every other localisation must declare the same
//! messages with the same ordered argument lists.

use crate::error::{self, CodegenError, CodegenResult, Location, SchemaError, SchemaErrorKind};
use crate::ir::{Argument, Language, Localization, MessageScope};
use crate::naming;

/// One method of the localizer contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    /// Message name as declared.
    pub message: String,
    /// Method identifier.
    pub method: String,
    /// Parameters in order.
    pub arguments: Vec<Argument>,
}

impl MethodSig {
    fn from_scope(scope: &MessageScope, language: &Language) -> Result<Self, SchemaError> {
        let method = naming::method_name(&scope.name).map_err(|kind| {
            SchemaError::new(Location::language(language.as_str()).message(&scope.name), kind)
        })?;
        Ok(Self {
            message: scope.name.clone(),
            method,
            arguments: scope.arguments.clone(),
        })
    }

    /// Human-readable parameter list, for example `count: integer, name: text`.
    #[must_use]
    pub fn signature(&self) -> String {
        describe(&self.arguments)
    }
}

fn describe(arguments: &[Argument]) -> String {
    arguments
        .iter()
        .map(|argument| format!("{}: {}", argument.name, argument.ty))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The trait every generated localizer implements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    /// Methods in the reference language's declaration order.
    pub methods: Vec<MethodSig>,
}

impl Contract {
    /// Derives the contract from a reference localisation.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when a message name is not a usable method
    /// identifier.
    pub fn from_reference(reference: &Localization) -> Result<Self, SchemaError> {
        let methods = reference
            .scopes
            .iter()
            .map(|scope| MethodSig::from_scope(scope, &reference.language))
            .collect::<Result<_, _>>()?;
        Ok(Self { methods })
    }

    /// Looks up a method by message name.
    #[must_use]
    pub fn method(&self, message: &str) -> Option<&MethodSig> {
        self.methods.iter().find(|method| method.message == message)
    }

    /// Checks that `localization` declares exactly the contract's messages
    /// with identical ordered argument lists.
    #[must_use]
    pub fn conformance(
        &self,
        reference: &Language,
        localization: &Localization,
    ) -> Vec<SchemaError> {
        let root = Location::language(localization.language.as_str());
        let mut errors = Vec::new();
        for method in &self.methods {
            let location = root.clone().message(&method.message);
            match localization.scope(&method.message) {
                None => errors.push(SchemaError::new(
                    location,
                    SchemaErrorKind::MissingMessage(reference.as_str().to_owned()),
                )),
                Some(scope) if scope.arguments != method.arguments => {
                    errors.push(SchemaError::new(
                        location,
                        SchemaErrorKind::SignatureMismatch {
                            expected: method.signature(),
                            found: describe(&scope.arguments),
                        },
                    ));
                }
                Some(_) => {}
            }
        }
        for scope in &localization.scopes {
            if self.method(&scope.name).is_none() {
                errors.push(SchemaError::new(
                    root.clone().message(&scope.name),
                    SchemaErrorKind::UnexpectedMessage(reference.as_str().to_owned()),
                ));
            }
        }
        errors
    }
}

/// A registered language and the names of its generated items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Language identifier.
    pub language: Language,
    /// Module holding the language's unit.
    pub module: String,
    /// Localizer type name.
    pub type_name: String,
}

/// Languages in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry(Vec<RegistryEntry>);

impl Registry {
    /// Registered entries in order.
    #[must_use]
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.0
    }

    /// Looks up an entry by identifier.
    #[must_use]
    pub fn lookup(&self, language: &str) -> Option<&RegistryEntry> {
        self.0
            .iter()
            .find(|entry| entry.language.as_str() == language)
    }

    /// Registered identifiers in order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|entry| entry.language.as_str())
    }
}

/// Result of unification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unified {
    /// Language the contract was derived from.
    pub reference: Language,
    /// Shared contract.
    pub contract: Contract,
    /// Registry of every language.
    pub registry: Registry,
}

/// Derives the contract from the first localisation, checks every other
/// localisation against it and builds the registry.
///
/// # Errors
///
/// Returns [`CodegenError::NoLocalizations`] for an empty input and every
/// conformance or naming error otherwise.
pub fn unify(localizations: &[Localization]) -> CodegenResult<Unified> {
    let Some(reference) = localizations.first() else {
        return Err(CodegenError::NoLocalizations);
    };
    let contract = Contract::from_reference(reference)?;

    let mut errors = Vec::new();
    let mut entries = Vec::with_capacity(localizations.len());
    for localization in localizations {
        errors.extend(contract.conformance(&reference.language, localization));
        let names = naming::module_name(&localization.language)
            .and_then(|module| Ok((module, naming::type_name(&localization.language)?)));
        match names {
            Ok((module, type_name)) => entries.push(RegistryEntry {
                language: localization.language.clone(),
                module,
                type_name,
            }),
            Err(kind) => errors.push(SchemaError::new(
                Location::language(localization.language.as_str()),
                kind,
            )),
        }
    }
    error::collect(errors)?;
    tracing::debug!(
        reference = %reference.language,
        methods = contract.methods.len(),
        languages = entries.len(),
        "unified localizations"
    );
    Ok(Unified {
        reference: reference.language.clone(),
        contract,
        registry: Registry(entries),
    })
}
