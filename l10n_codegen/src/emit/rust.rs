//! Renders localizers as Rust source files.
//!
//! Tokens are assembled with `quote`, checked by parsing them into a
//! [`syn::File`] and pretty-printed with `prettyplease`. The general unit
//! becomes `mod.rs`; each language becomes `<module>.rs` next to it.

use proc_macro2::TokenStream;
use quote::quote;

use crate::config::CodegenConfig;
use crate::error::{CodegenError, CodegenResult};
use crate::lower::LoweredLocalization;
use crate::naming::TRAIT_NAME;
use crate::unify::{RegistryEntry, Unified};

use super::body::{self, ident};
use super::{Emitter, GeneratedFile};

/// File name of the general unit.
pub const GENERAL_FILE: &str = "mod.rs";

/// Emits `mod.rs` plus one file per language.
#[derive(Debug, Clone, Default)]
pub struct RustEmitter {
    config: CodegenConfig,
}

impl RustEmitter {
    /// Creates an emitter for `config`.
    #[must_use]
    pub const fn new(config: CodegenConfig) -> Self {
        Self { config }
    }

    /// Tokens of the general unit.
    ///
    /// # Errors
    ///
    /// Returns an error when a contract or registry name is not a valid
    /// identifier.
    pub fn general_tokens(&self, unified: &Unified) -> CodegenResult<TokenStream> {
        let trait_ident = ident(TRAIT_NAME)?;
        let entries = unified.registry.entries();
        let modules = entries
            .iter()
            .map(|entry| ident(&entry.module))
            .collect::<CodegenResult<Vec<_>>>()?;
        let types = entries
            .iter()
            .map(|entry| ident(&entry.type_name))
            .collect::<CodegenResult<Vec<_>>>()?;
        let languages: Vec<&str> = entries
            .iter()
            .map(|entry| entry.language.as_str())
            .collect();
        let methods = unified
            .contract
            .methods
            .iter()
            .map(|sig| body::trait_method(sig, &unified.reference, self.config.integer))
            .collect::<CodegenResult<Vec<_>>>()?;
        let registry = languages
            .iter()
            .zip(&types)
            .map(|(language, ty)| quote! { (#language, &#ty as &dyn #trait_ident) });
        let module_doc = format!(" Localizers generated for the `{}` module.", self.config.module);

        Ok(quote! {
            #![doc = #module_doc]

            #(mod #modules;)*

            #(pub use #modules::#types;)*

            /// Messages every supported language implements.
            pub trait #trait_ident: ::core::any::Any + Send + Sync {
                #(#methods)*
            }

            /// Identifiers of the supported languages, in registration order.
            pub const SUPPORTED: &[&str] = &[#(#languages),*];

            static REGISTRY: &[(&str, &dyn #trait_ident)] = &[#(#registry),*];

            /// Returns the localizer registered for `lang`, or `None` when the
            /// identifier is unknown.
            #[must_use]
            pub fn new(lang: &str) -> Option<&'static dyn #trait_ident> {
                REGISTRY
                    .iter()
                    .find(|(id, _)| *id == lang)
                    .map(|(_, localizer)| *localizer)
            }

            /// Returns the language identifier of `localizer`, or `""` when it
            /// is not one of the generated localizers.
            #[must_use]
            pub fn language(localizer: &dyn #trait_ident) -> &'static str {
                let any: &dyn ::core::any::Any = localizer;
                #(
                    if any.is::<#types>() {
                        return #languages;
                    }
                )*
                ""
            }
        })
    }

    /// Tokens of one language unit.
    ///
    /// # Errors
    ///
    /// Returns an error when a lowered name is not a valid identifier or a
    /// user type path does not parse.
    pub fn localization_tokens(
        &self,
        entry: &RegistryEntry,
        unit: &LoweredLocalization,
    ) -> CodegenResult<TokenStream> {
        let trait_ident = ident(TRAIT_NAME)?;
        let type_ident = ident(&entry.type_name)?;
        let language = entry.language.as_str();
        let imports = unit
            .dependencies
            .imports()
            .into_iter()
            .map(crate::deps::Import::tokens);
        let auxiliaries = unit
            .auxiliaries
            .iter()
            .filter(|function| function.referenced)
            .map(|function| body::auxiliary_method(function, self.config.integer))
            .collect::<CodegenResult<Vec<_>>>()?;
        let messages = unit
            .messages
            .iter()
            .map(|function| body::message_method(function, self.config.integer))
            .collect::<CodegenResult<Vec<_>>>()?;
        let doc = format!(" Localizer for the `{language}` language.");
        let inherent = (!auxiliaries.is_empty()).then(|| {
            quote! {
                impl #type_ident {
                    #(#auxiliaries)*
                }
            }
        });

        Ok(quote! {
            #(#imports)*
            use super::#trait_ident;

            #[doc = #doc]
            #[derive(Debug, Clone, Copy, Default)]
            pub struct #type_ident;

            #inherent

            impl #trait_ident for #type_ident {
                #(#messages)*
            }
        })
    }

    /// Parses `tokens` as a file and pretty-prints it behind the header.
    fn render(&self, unit: &str, tokens: TokenStream) -> CodegenResult<String> {
        let file = syn::parse2::<syn::File>(tokens).map_err(|source| CodegenError::Render {
            unit: unit.to_owned(),
            source,
        })?;
        Ok(format!("{}\n{}", self.config.header(), prettyplease::unparse(&file)))
    }
}

impl Emitter for RustEmitter {
    type Output = GeneratedFile;

    fn general(&self, unified: &Unified) -> CodegenResult<GeneratedFile> {
        let contents = self.render(GENERAL_FILE, self.general_tokens(unified)?)?;
        Ok(GeneratedFile {
            name: GENERAL_FILE.to_owned(),
            contents,
        })
    }

    fn localization(
        &self,
        _unified: &Unified,
        entry: &RegistryEntry,
        unit: &LoweredLocalization,
    ) -> CodegenResult<GeneratedFile> {
        let name = format!("{}.rs", entry.module);
        let contents = self.render(&name, self.localization_tokens(entry, unit)?)?;
        tracing::debug!(file = %name, bytes = contents.len(), "rendered localization unit");
        Ok(GeneratedFile { name, contents })
    }
}
