//! Type-driven argument-schema resolution.
//!
//! This crate turns a declared schema — named fields, each with a type,
//! optional default, docstring, and metadata — into concrete
//! command-line flag definitions, and turns parsed raw tokens back into
//! a typed instance of that schema:
//!
//! - [`FieldDeclaration`], [`TypeRef`], [`Metadata`] — the declaration
//!   model ([`types`] module).
//! - [`resolve_type`] and [`Factory`] — declared types to text→value
//!   conversion, including first-success union trials.
//! - [`ArgumentSpec`] and [`RegistrationArgs`] — resolved flag
//!   definitions and their engine-facing finalization.
//! - [`Schema`] — declarative field registration plus typed instance
//!   construction from a parsed [`Namespace`].
//! - [`ParserEngine`] — the contract of the external token-matching
//!   engine (the `argdecl-engine` crate ships the reference
//!   implementation; this crate implements no tokenizer).
//! - [`assemble`] and [`SchemaParser`] — idempotent registration with
//!   exclusive-group wiring, and the owning parse wrapper.
//!
//! # Example
//!
//! ```
//! use argdecl_core::*;
//!
//! struct Fetch;
//!
//! impl Schema for Fetch {
//!     fn name() -> &'static str {
//!         "fetch"
//!     }
//!
//!     fn fields() -> Vec<FieldDeclaration> {
//!         vec![
//!             FieldDeclaration::new("url", TypeRef::Scalar(ScalarType::Str))
//!                 .with_metadata(Metadata::flags(["url"]))
//!                 .with_doc("URL to fetch"),
//!             FieldDeclaration::new("retries", TypeRef::Scalar(ScalarType::Int))
//!                 .with_default(Value::Int(3)),
//!             FieldDeclaration::new("verbose", TypeRef::Scalar(ScalarType::Bool)),
//!         ]
//!     }
//!
//!     fn from_namespace(_ns: &mut Namespace) -> Result<Self, ConstructionError> {
//!         Ok(Fetch)
//!     }
//! }
//!
//! let specs = build_specs::<Fetch>();
//! assert_eq!(specs.len(), 3);
//!
//! // Positional argument: no destination override, engine derives it.
//! let url = specs[0].registration_args();
//! assert!(url.dest.is_none());
//!
//! // Defaulted flag: optional.
//! let retries = specs[1].registration_args();
//! assert_eq!(retries.flags, vec!["--retries".to_string()]);
//! assert_eq!(retries.required, Some(false));
//!
//! // Boolean flag: no-value action, default false.
//! let verbose = specs[2].registration_args();
//! assert_eq!(verbose.action, ActionKind::StoreTrue);
//! assert_eq!(verbose.default, Some(Value::Bool(false)));
//! ```

mod assemble;
mod build;
mod engine;
mod resolve;
mod schema;
mod spec;
mod types;

pub use assemble::{ExclusiveGroups, ParseError, SchemaParser, SchemaRegistry, assemble};
pub use build::{ArgumentSpecBuilder, SpecBuilder, build_specs, build_specs_with};
pub use engine::{EngineError, ParserEngine};
pub use resolve::{ConversionError, Factory, resolve_type};
pub use schema::{ConstructionError, Namespace, Schema};
pub use spec::{ArgumentSpec, RegistrationArgs};
pub use types::*;
