//! Code emission.
//!
//! An [`Emitter`] turns the unified contract and each lowered localisation
//! into output units. [`RustEmitter`] is the production implementation and
//! renders formatted Rust source files.

mod body;
pub mod rust;

use crate::error::CodegenResult;
use crate::lower::LoweredLocalization;
use crate::unify::{RegistryEntry, Unified};

pub use rust::RustEmitter;

/// A rendered output file, named relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name, for example `mod.rs` or `en.rs`.
    pub name: String,
    /// Complete file contents.
    pub contents: String,
}

/// Renders compilation results into output units.
pub trait Emitter {
    /// One rendered unit.
    type Output;

    /// Renders the general unit: the contract, the registry and lookups.
    ///
    /// # Errors
    ///
    /// Returns an error when the unit cannot be rendered.
    fn general(&self, unified: &Unified) -> CodegenResult<Self::Output>;

    /// Renders the unit implementing the contract for one language.
    ///
    /// # Errors
    ///
    /// Returns an error when the unit cannot be rendered.
    fn localization(
        &self,
        unified: &Unified,
        entry: &RegistryEntry,
        unit: &LoweredLocalization,
    ) -> CodegenResult<Self::Output>;
}
