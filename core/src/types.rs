//! Data model for declarative argument schemas.
//!
//! This module defines the value and declaration types the resolver works
//! over: parsed [`Value`]s, constructible [`ScalarType`]s, declared
//! [`TypeRef`]s (including optionals and unions), per-field [`Metadata`]
//! annotations, and the [`FieldDeclaration`] entries a schema is built from.
//! The pure data types serialize with [`serde`] so parsed results can
//! round-trip through JSON.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::resolve::Factory;

/// A parsed argument value.
///
/// Produced by a field's conversion [`Factory`] from raw token text, or
/// taken from a declared default. `List` holds the values of
/// multi-valued arguments (`nargs`, `append`).
///
/// # Examples
///
/// ```
/// use argdecl_core::Value;
///
/// let v = Value::Int(5);
/// assert_eq!(serde_json::to_string(&v).unwrap(), "5");
/// assert_eq!(v.kind(), "int");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean, from no-value flags or `bool` conversion.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Free-form string.
    Str(String),
    /// Filesystem path.
    Path(PathBuf),
    /// Multiple values collected for one destination.
    List(Vec<Value>),
}

impl Value {
    /// Short name of the value's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Path(_) => "path",
            Value::List(_) => "list",
        }
    }
}

/// A concrete constructible type: a conversion from token text to a value.
///
/// `Choice` accepts only one of the listed strings (e.g.
/// `--format json|yaml`) and yields the matched string.
///
/// # Examples
///
/// ```
/// use argdecl_core::{ScalarType, Value};
///
/// assert_eq!(ScalarType::Int.convert("42"), Some(Value::Int(42)));
/// assert_eq!(ScalarType::Int.convert("x"), None);
/// assert_eq!(ScalarType::Str.convert("x"), Some(Value::Str("x".into())));
///
/// let fmt = ScalarType::Choice(vec!["json".into(), "yaml".into()]);
/// assert_eq!(fmt.convert("json"), Some(Value::Str("json".into())));
/// assert_eq!(fmt.convert("toml"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    /// Boolean (`true/false`, `1/0`, `yes/no`, `on/off`, case-insensitive).
    Bool,
    /// Signed integer.
    Int,
    /// Floating-point number.
    Float,
    /// Any string (never fails).
    Str,
    /// Filesystem path (never fails).
    Path,
    /// One of specific string choices.
    Choice(Vec<String>),
}

impl ScalarType {
    /// Attempts to construct a [`Value`] from raw token text.
    ///
    /// Returns `None` when the text is not acceptable for this type;
    /// union resolution relies on that to fall through to the next
    /// candidate.
    pub fn convert(&self, text: &str) -> Option<Value> {
        match self {
            ScalarType::Bool => match text.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(Value::Bool(true)),
                "false" | "0" | "no" | "off" => Some(Value::Bool(false)),
                _ => None,
            },
            ScalarType::Int => text.parse::<i64>().ok().map(Value::Int),
            ScalarType::Float => text.parse::<f64>().ok().map(Value::Float),
            ScalarType::Str => Some(Value::Str(text.to_string())),
            ScalarType::Path => Some(Value::Path(PathBuf::from(text))),
            ScalarType::Choice(choices) => choices
                .iter()
                .any(|c| c == text)
                .then(|| Value::Str(text.to_string())),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Bool => f.write_str("bool"),
            ScalarType::Int => f.write_str("int"),
            ScalarType::Float => f.write_str("float"),
            ScalarType::Str => f.write_str("str"),
            ScalarType::Path => f.write_str("path"),
            ScalarType::Choice(choices) => write!(f, "choice[{}]", choices.join("|")),
        }
    }
}

/// A declared field type.
///
/// Either a single concrete type, an optional wrapper (the field may be
/// absent; lowers `required` to `false`), or a union of two or more
/// candidate types tried in declaration order.
///
/// # Examples
///
/// ```
/// use argdecl_core::{ScalarType, TypeRef};
///
/// let plain = TypeRef::Scalar(ScalarType::Int);
/// let opt = TypeRef::Optional(Box::new(plain.clone()));
/// let either = TypeRef::Union(vec![ScalarType::Int, ScalarType::Str]);
/// assert_ne!(opt, either);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    /// A single concrete type.
    Scalar(ScalarType),
    /// The wrapped type or nothing at all.
    Optional(Box<TypeRef>),
    /// Candidate types tried in declaration order; first success wins.
    Union(Vec<ScalarType>),
}

/// How the engine stores a matched argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActionKind {
    /// Convert and store the flag's value (the default).
    #[default]
    Store,
    /// Store `true` on presence; consumes no value.
    StoreTrue,
    /// Count occurrences; consumes no value.
    Count,
    /// Convert and append each occurrence's value to a list.
    Append,
}

/// Number of value tokens an argument consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    /// Exactly `n` values.
    Exactly(usize),
    /// Zero or one value.
    Optional,
    /// Any number of values, possibly none.
    ZeroOrMore,
    /// At least one value.
    OneOrMore,
}

/// Help text for one argument: a fixed string or a deferred producer
/// invoked at registration time.
///
/// # Examples
///
/// ```
/// use argdecl_core::HelpText;
///
/// fn late() -> String {
///     "computed".to_string()
/// }
///
/// assert_eq!(HelpText::from("fixed").render(), "fixed");
/// assert_eq!(HelpText::Deferred(late).render(), "computed");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum HelpText {
    /// Literal help string.
    Text(String),
    /// Producer called when the argument is registered.
    Deferred(fn() -> String),
}

impl HelpText {
    /// Renders the help string.
    pub fn render(&self) -> String {
        match self {
            HelpText::Text(text) => text.clone(),
            HelpText::Deferred(produce) => produce(),
        }
    }
}

impl Default for HelpText {
    fn default() -> Self {
        HelpText::Text(String::new())
    }
}

impl From<&str> for HelpText {
    fn from(text: &str) -> Self {
        HelpText::Text(text.to_string())
    }
}

impl From<String> for HelpText {
    fn from(text: String) -> Self {
        HelpText::Text(text)
    }
}

/// One metadata annotation attached to a field declaration.
///
/// Every override is optional; a field carries an ordered list of
/// annotations and the spec builder merges them. Flag aliases take the
/// *first* annotation that supplies them; every other override takes the
/// last one.
///
/// # Examples
///
/// ```
/// use argdecl_core::{ActionKind, Metadata};
///
/// let m = Metadata::flags(["-v", "--verbose"]).with_conflicts("verbosity");
/// assert_eq!(m.flags.as_deref(), Some(&["-v".to_string(), "--verbose".to_string()][..]));
///
/// let merged = Metadata::merged(&[m, Metadata::new().with_action(ActionKind::Count)]);
/// assert_eq!(merged.action, Some(ActionKind::Count));
/// assert_eq!(merged.conflicts.as_deref(), Some("verbosity"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    /// Flag aliases, first is canonical (e.g. `["-v", "--verbose"]`).
    pub flags: Option<Vec<String>>,
    /// Explicit conversion factory, overriding type resolution.
    pub factory: Option<Factory>,
    /// Default value override.
    pub default: Option<Value>,
    /// Help text override.
    pub help: Option<HelpText>,
    /// Explicit required override.
    pub required: Option<bool>,
    /// Storage action override.
    pub action: Option<ActionKind>,
    /// Arity override.
    pub nargs: Option<Arity>,
    /// Conflict tag: fields sharing a tag are mutually exclusive.
    pub conflicts: Option<String>,
    /// Excludes the field from parser construction entirely when set on
    /// the first annotation.
    pub suppress: bool,
}

impl Metadata {
    /// Creates an empty annotation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an annotation supplying flag aliases.
    pub fn flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flags: Some(flags.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Creates the suppression marker.
    pub fn suppress() -> Self {
        Self {
            suppress: true,
            ..Self::default()
        }
    }

    /// Sets an explicit conversion factory.
    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Sets a default value override.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets a help text override.
    pub fn with_help(mut self, help: impl Into<HelpText>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets an explicit required override.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Sets a storage action override.
    pub fn with_action(mut self, action: ActionKind) -> Self {
        self.action = Some(action);
        self
    }

    /// Sets an arity override.
    pub fn with_nargs(mut self, nargs: Arity) -> Self {
        self.nargs = Some(nargs);
        self
    }

    /// Sets a conflict tag.
    pub fn with_conflicts(mut self, tag: impl Into<String>) -> Self {
        self.conflicts = Some(tag.into());
        self
    }

    /// Merges an ordered annotation list into one effective annotation.
    ///
    /// Flags keep the first occurrence; all other overrides keep the
    /// last. Suppression holds if any entry sets it.
    pub fn merged(annotations: &[Metadata]) -> Metadata {
        let mut merged = Metadata::new();
        for entry in annotations {
            if merged.flags.is_none() {
                merged.flags = entry.flags.clone();
            }
            if entry.factory.is_some() {
                merged.factory = entry.factory.clone();
            }
            if entry.default.is_some() {
                merged.default = entry.default.clone();
            }
            if entry.help.is_some() {
                merged.help = entry.help.clone();
            }
            if entry.required.is_some() {
                merged.required = entry.required;
            }
            if entry.action.is_some() {
                merged.action = entry.action;
            }
            if entry.nargs.is_some() {
                merged.nargs = entry.nargs;
            }
            if entry.conflicts.is_some() {
                merged.conflicts = entry.conflicts.clone();
            }
            merged.suppress |= entry.suppress;
        }
        merged
    }
}

/// One named entry in a schema: declared type, default, docstring, and
/// metadata annotations.
///
/// Declarations are plain values built once per schema; `None` for the
/// type or default means the field declared neither.
///
/// # Examples
///
/// ```
/// use argdecl_core::{FieldDeclaration, Metadata, ScalarType, TypeRef, Value};
///
/// let retries = FieldDeclaration::new("retries", TypeRef::Scalar(ScalarType::Int))
///     .with_default(Value::Int(3))
///     .with_doc("Number of retry attempts");
/// assert_eq!(retries.name, "retries");
/// assert_eq!(retries.default, Some(Value::Int(3)));
///
/// let hidden = FieldDeclaration::untyped("internal").with_metadata(Metadata::suppress());
/// assert!(hidden.ty.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct FieldDeclaration {
    /// Field name, unique within one schema.
    pub name: String,
    /// Declared type, if any.
    pub ty: Option<TypeRef>,
    /// Declared default, if any.
    pub default: Option<Value>,
    /// Docstring, used as the argument's help text.
    pub doc: String,
    /// Ordered metadata annotations.
    pub annotations: Vec<Metadata>,
}

impl FieldDeclaration {
    /// Creates a declaration with a declared type.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            default: None,
            doc: String::new(),
            annotations: Vec::new(),
        }
    }

    /// Creates a declaration without a declared type.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            default: None,
            doc: String::new(),
            annotations: Vec::new(),
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the docstring.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Appends a metadata annotation.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.annotations.push(metadata);
        self
    }
}
