//! The parsing-engine contract.
//!
//! The engine is a collaborator, not part of this crate: it owns
//! tokenized flag matching, mutual-exclusion enforcement, and help
//! rendering. [`ParserEngine`] is the seam the assembler registers
//! argument specs against; `argdecl-engine` ships the reference
//! implementation.

use thiserror::Error;

use crate::resolve::ConversionError;
use crate::schema::Namespace;
use crate::spec::RegistrationArgs;

/// Errors reported by a parsing engine, at registration or match time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A value token failed conversion for the named flag.
    #[error("argument {flag}: {source}")]
    InvalidValue {
        /// Canonical flag of the failing argument.
        flag: String,
        /// The underlying conversion failure.
        source: ConversionError,
    },

    /// A required argument never appeared in the token list.
    #[error("missing required argument: {0}")]
    MissingRequired(String),

    /// Two members of one exclusive group both appeared.
    #[error("argument {flag} not allowed with {other}")]
    Conflict {
        /// The flag matched second.
        flag: String,
        /// The group member matched first.
        other: String,
    },

    /// A value-consuming flag had no value token to consume.
    #[error("argument {0} expects a value")]
    MissingValue(String),

    /// A no-value flag was given an inline value (`--verbose=yes`).
    #[error("argument {0} does not take a value")]
    UnexpectedValue(String),

    /// A flag string was registered twice.
    #[error("duplicate flag: {0}")]
    DuplicateFlag(String),

    /// A flag string had an invalid format at registration.
    #[error("invalid flag format: {0}")]
    InvalidFlag(String),
}

/// External token-matching parser engine.
///
/// Supplies argument registration (top-level and per exclusive group)
/// and a parse entry point that fills a [`Namespace`] in place and
/// returns the tokens it could not match.
pub trait ParserEngine {
    /// Opaque per-argument handle returned by registration.
    type Handle;
    /// Opaque exclusive-group handle.
    type Group;

    /// Registers an argument at the parser's top-level scope.
    fn add_argument(&mut self, args: RegistrationArgs) -> Result<Self::Handle, EngineError>;

    /// Creates a new mutually-exclusive group.
    fn add_exclusive_group(&mut self) -> Self::Group;

    /// Registers an argument inside an exclusive group's scope.
    fn add_group_argument(
        &mut self,
        group: &Self::Group,
        args: RegistrationArgs,
    ) -> Result<Self::Handle, EngineError>;

    /// Matches tokens against the registered arguments, filling `ns` in
    /// place (one entry per destination that matched or defaulted) and
    /// returning the leftover tokens it did not recognize.
    fn parse_known(&self, tokens: &[String], ns: &mut Namespace)
    -> Result<Vec<String>, EngineError>;
}
