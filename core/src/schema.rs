//! Schema declaration and typed instance construction.
//!
//! A [`Schema`] declares its fields as a static list of
//! [`FieldDeclaration`]s and reconstructs a typed instance from the
//! [`Namespace`] the engine filled during parsing. The namespace's
//! `take_*` helpers cover the common extraction patterns and produce
//! [`ConstructionError`]s for missing or mistyped entries.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{FieldDeclaration, Value};

/// Raised when reconstructing a typed instance from parsed values fails.
///
/// Not recovered locally; surfaced as a fatal start-up error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// A required constructor input was absent from the parsed values.
    #[error("missing field {0:?} in parsed values")]
    MissingField(String),
    /// A parsed value had the wrong shape for its field.
    #[error("field {field:?} expected {expected}, found {found}")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Expected value kind.
        expected: &'static str,
        /// Actual value kind found.
        found: &'static str,
    },
}

/// A declared argument schema.
///
/// Fields are registered declaratively: [`fields`](Schema::fields)
/// returns the ordered declaration list the spec builder consumes, and
/// [`from_namespace`](Schema::from_namespace) is the constructor invoked
/// with the parsed values.
///
/// # Examples
///
/// ```
/// use argdecl_core::{
///     ConstructionError, FieldDeclaration, Namespace, ScalarType, Schema, TypeRef, Value,
/// };
///
/// struct Greet {
///     name: String,
///     shout: bool,
/// }
///
/// impl Schema for Greet {
///     fn name() -> &'static str {
///         "greet"
///     }
///
///     fn fields() -> Vec<FieldDeclaration> {
///         vec![
///             FieldDeclaration::new("name", TypeRef::Scalar(ScalarType::Str)),
///             FieldDeclaration::new("shout", TypeRef::Scalar(ScalarType::Bool)),
///         ]
///     }
///
///     fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
///         Ok(Self {
///             name: ns.take_string("name")?,
///             shout: ns.take_bool("shout")?,
///         })
///     }
/// }
///
/// let mut ns = Namespace::new();
/// ns.insert("name", Value::Str("world".into()));
/// ns.insert("shout", Value::Bool(false));
///
/// let greet = Greet::from_namespace(&mut ns).unwrap();
/// assert_eq!(greet.name, "world");
/// assert!(!greet.shout);
/// ```
pub trait Schema: Sized {
    /// Parser name for this schema (program or subcommand name).
    fn name() -> &'static str;

    /// One-line description, used by the engine's help output.
    fn description() -> &'static str {
        ""
    }

    /// Ordered field declarations.
    fn fields() -> Vec<FieldDeclaration>;

    /// Constructs a typed instance from parsed field values.
    fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError>;
}

/// Mutable mapping from destination name to parsed value.
///
/// The engine fills a namespace in place during parsing — one entry per
/// registered destination that matched or carried a default — and the
/// schema constructor drains it with the `take_*` helpers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace {
    values: BTreeMap<String, Value>,
}

impl Namespace {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning any previous entry.
    pub fn insert(&mut self, dest: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(dest.into(), value)
    }

    /// Looks up a value by destination.
    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.values.get(dest)
    }

    /// Mutable lookup, for in-place accumulation (count, append).
    pub fn get_mut(&mut self, dest: &str) -> Option<&mut Value> {
        self.values.get_mut(dest)
    }

    /// Removes and returns a value.
    pub fn remove(&mut self, dest: &str) -> Option<Value> {
        self.values.remove(dest)
    }

    /// Whether a destination is present.
    pub fn contains(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the namespace holds no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates entries in destination order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Removes a value, failing when the destination is absent.
    pub fn require(&mut self, dest: &str) -> Result<Value, ConstructionError> {
        self.remove(dest)
            .ok_or_else(|| ConstructionError::MissingField(dest.to_string()))
    }

    /// Takes a required string field.
    pub fn take_string(&mut self, dest: &str) -> Result<String, ConstructionError> {
        match self.require(dest)? {
            Value::Str(s) => Ok(s),
            other => Err(mismatch(dest, "str", &other)),
        }
    }

    /// Takes a required integer field.
    pub fn take_int(&mut self, dest: &str) -> Result<i64, ConstructionError> {
        match self.require(dest)? {
            Value::Int(n) => Ok(n),
            other => Err(mismatch(dest, "int", &other)),
        }
    }

    /// Takes a required float field.
    pub fn take_float(&mut self, dest: &str) -> Result<f64, ConstructionError> {
        match self.require(dest)? {
            Value::Float(x) => Ok(x),
            other => Err(mismatch(dest, "float", &other)),
        }
    }

    /// Takes a required boolean field.
    pub fn take_bool(&mut self, dest: &str) -> Result<bool, ConstructionError> {
        match self.require(dest)? {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(dest, "bool", &other)),
        }
    }

    /// Takes a required path field.
    pub fn take_path(&mut self, dest: &str) -> Result<PathBuf, ConstructionError> {
        match self.require(dest)? {
            Value::Path(p) => Ok(p),
            other => Err(mismatch(dest, "path", &other)),
        }
    }

    /// Takes a required list field.
    pub fn take_list(&mut self, dest: &str) -> Result<Vec<Value>, ConstructionError> {
        match self.require(dest)? {
            Value::List(items) => Ok(items),
            other => Err(mismatch(dest, "list", &other)),
        }
    }

    /// Takes an optional raw value.
    pub fn take_value(&mut self, dest: &str) -> Option<Value> {
        self.remove(dest)
    }

    /// Takes an optional string field; absent is `None`, mistyped fails.
    pub fn take_opt_string(&mut self, dest: &str) -> Result<Option<String>, ConstructionError> {
        match self.remove(dest) {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s)),
            Some(other) => Err(mismatch(dest, "str", &other)),
        }
    }

    /// Takes an optional integer field.
    pub fn take_opt_int(&mut self, dest: &str) -> Result<Option<i64>, ConstructionError> {
        match self.remove(dest) {
            None => Ok(None),
            Some(Value::Int(n)) => Ok(Some(n)),
            Some(other) => Err(mismatch(dest, "int", &other)),
        }
    }

    /// Takes an optional float field.
    pub fn take_opt_float(&mut self, dest: &str) -> Result<Option<f64>, ConstructionError> {
        match self.remove(dest) {
            None => Ok(None),
            Some(Value::Float(x)) => Ok(Some(x)),
            Some(other) => Err(mismatch(dest, "float", &other)),
        }
    }

    /// Takes an optional path field.
    pub fn take_opt_path(&mut self, dest: &str) -> Result<Option<PathBuf>, ConstructionError> {
        match self.remove(dest) {
            None => Ok(None),
            Some(Value::Path(p)) => Ok(Some(p)),
            Some(other) => Err(mismatch(dest, "path", &other)),
        }
    }
}

fn mismatch(dest: &str, expected: &'static str, found: &Value) -> ConstructionError {
    ConstructionError::TypeMismatch {
        field: dest.to_string(),
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_helpers_extract_and_drain() {
        let mut ns = Namespace::new();
        ns.insert("count", Value::Int(5));
        ns.insert("name", Value::Str("widget".into()));

        assert_eq!(ns.take_int("count").unwrap(), 5);
        assert_eq!(ns.take_string("name").unwrap(), "widget");
        assert!(ns.is_empty());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let mut ns = Namespace::new();
        assert_eq!(
            ns.take_int("count"),
            Err(ConstructionError::MissingField("count".into()))
        );
    }

    #[test]
    fn test_type_mismatch_names_both_kinds() {
        let mut ns = Namespace::new();
        ns.insert("count", Value::Str("five".into()));

        let err = ns.take_int("count").unwrap_err();
        assert_eq!(
            err,
            ConstructionError::TypeMismatch {
                field: "count".into(),
                expected: "int",
                found: "str",
            }
        );
    }

    #[test]
    fn test_optional_extractors_distinguish_absent_from_mistyped() {
        let mut ns = Namespace::new();
        assert_eq!(ns.take_opt_int("missing").unwrap(), None);

        ns.insert("present", Value::Int(1));
        assert_eq!(ns.take_opt_int("present").unwrap(), Some(1));

        ns.insert("wrong", Value::Bool(true));
        assert!(ns.take_opt_int("wrong").is_err());
    }
}
