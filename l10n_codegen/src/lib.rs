//! Message compiler for typed localizers.
//!
//! The crate turns per-language message definitions, expressed in the
//! [`ir`] model, into Rust source. Each language becomes a unit struct that
//! implements one shared `Localizer` trait; a generated registry constructs
//! localizers by identifier and identifies them again.
//!
//! Compilation runs in four stages:
//!
//! 1. [`validate`] checks every localisation against the schema rules.
//! 2. [`lower`] turns each message and shared variable into a function plan,
//!    resolving argument formatting through [`resolve`] and recording the
//!    capabilities the plans need in [`deps`].
//! 3. [`unify`] derives the shared contract from the first language and
//!    checks every other language against it.
//! 4. [`emit`] renders the contract, the registry and each language unit.
//!
//! [`Compiler`] drives the stages. The [`eval`] interpreter executes lowered
//! plans directly, which is how messages are previewed without compiling the
//! generated code.
//!
//! ```
//! use l10n_codegen::ir::{FormatParts, Localization, MessageScope, SemanticType, Template};
//! use l10n_codegen::{CodegenConfig, Compiler, Value};
//!
//! let en = Localization::new("en").with_scope(
//!     MessageScope::new("greeting")
//!         .with_argument("name", SemanticType::Text)
//!         .with_template(Template::Plain(
//!             FormatParts::new().literal("Hello, ").argument("name"),
//!         )),
//! );
//! let compiled = Compiler::new(CodegenConfig::default()).compile(&[en])?;
//! let text = compiled.evaluate("en", "greeting", &[("name", Value::from("Ada"))])?;
//! assert_eq!(text, "Hello, Ada");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod deps;
pub mod emit;
pub mod error;
pub mod eval;
pub mod ir;
pub mod lower;
pub mod naming;
pub mod pipeline;
pub mod resolve;
pub mod unify;
pub mod validate;

pub use config::{CodegenConfig, IntegerWidth};
pub use emit::{Emitter, GeneratedFile, RustEmitter};
pub use error::{CodegenError, CodegenResult, Location, SchemaError, SchemaErrorKind};
pub use eval::{EvalError, Evaluator, Value};
pub use pipeline::{Compiled, Compiler, compile};
pub use unify::{Contract, Unified};
