//! Reference token-matching engine for `argdecl` schemas.
//!
//! Implements the [`ParserEngine`](argdecl_core::ParserEngine) contract
//! the core resolver registers against: argument registration with flag
//! validation, exclusive groups enforced at match time, `--flag value`
//! and `--flag=value` matching with leftover-token reporting, and help
//! rendering.
//!
//! [`build_parser`] is the usual entry point: it names the parser after
//! the schema, assembles every field, and returns the typed
//! [`SchemaParser`](argdecl_core::SchemaParser) wrapper.
//!
//! # Example
//!
//! ```
//! use argdecl_core::*;
//! use argdecl_engine::build_parser;
//!
//! struct Order {
//!     name: String,
//!     count: i64,
//! }
//!
//! impl Schema for Order {
//!     fn name() -> &'static str {
//!         "order"
//!     }
//!
//!     fn fields() -> Vec<FieldDeclaration> {
//!         vec![
//!             FieldDeclaration::new("name", TypeRef::Scalar(ScalarType::Str))
//!                 .with_metadata(Metadata::flags(["name"]))
//!                 .with_doc("Item to order"),
//!             FieldDeclaration::new("count", TypeRef::Scalar(ScalarType::Int))
//!                 .with_default(Value::Int(1))
//!                 .with_doc("How many to order"),
//!         ]
//!     }
//!
//!     fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
//!         Ok(Self {
//!             name: ns.take_string("name")?,
//!             count: ns.take_int("count")?,
//!         })
//!     }
//! }
//!
//! let parser = build_parser::<Order>().unwrap();
//!
//! let order = parser.parse(["widget"]).unwrap();
//! assert_eq!(order.name, "widget");
//! assert_eq!(order.count, 1);
//!
//! let order = parser.parse(["widget", "--count", "5"]).unwrap();
//! assert_eq!(order.count, 5);
//! ```

mod help;
mod matcher;
mod parser;

pub use parser::{ArgHandle, ArgParser, GroupHandle};

use argdecl_core::{EngineError, Schema, SchemaParser};

/// Builds an assembled parser for a schema.
///
/// The underlying [`ArgParser`] takes its program name and description
/// from the schema; every non-suppressed field is registered and the
/// result is wrapped in a [`SchemaParser`].
pub fn build_parser<S: Schema>() -> Result<SchemaParser<S, ArgParser>, EngineError> {
    SchemaParser::new(ArgParser::new(S::name(), S::description()))
}
