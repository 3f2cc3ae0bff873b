//! Type resolution: declared field types to conversion factories.
//!
//! [`resolve_type`] decides how a field's raw token text becomes a typed
//! [`Value`](crate::Value): a single constructor for concrete types, a
//! first-success trial over the members of a union, and a `required`
//! override of `false` for optional types. An explicit [`Factory`]
//! supplied by metadata always wins over derivation.
//!
//! # Examples
//!
//! ```
//! use argdecl_core::{resolve_type, ScalarType, TypeRef, Value};
//!
//! let declared = TypeRef::Optional(Box::new(TypeRef::Scalar(ScalarType::Int)));
//! let (factory, required) = resolve_type(Some(&declared), None);
//!
//! assert_eq!(required, Some(false));
//! assert_eq!(factory.convert("42").unwrap(), Value::Int(42));
//! assert!(factory.convert("x").is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::types::{ScalarType, TypeRef, Value};

/// Raised when no candidate type's constructor accepts the given text.
///
/// Carries the raw text and the ordered list of attempted types, so the
/// failure can be reported as a user-facing "invalid value" message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid value {text:?} (tried {})", format_tried(.tried))]
pub struct ConversionError {
    /// The raw token text that no conversion accepted.
    pub text: String,
    /// Every type attempted, in trial order.
    pub tried: Vec<ScalarType>,
}

fn format_tried(tried: &[ScalarType]) -> String {
    tried
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text-to-value conversion function bound to one field.
///
/// `FirstOf` implements the union strategy: each member type's
/// constructor is attempted in declaration order and the first value
/// produced without a conversion failure wins. Overlapping acceptance is
/// resolved purely by that order — `Union[int, str]` never yields the
/// string `"007"` because integer conversion accepts it first.
#[derive(Clone)]
pub enum Factory {
    /// A single type's constructor.
    Type(ScalarType),
    /// First-success trial over candidate types, in declaration order.
    FirstOf(Vec<ScalarType>),
    /// A caller-supplied conversion function.
    Custom(Arc<dyn Fn(&str) -> Result<Value, ConversionError> + Send + Sync>),
}

impl Factory {
    /// Wraps a conversion function into a factory.
    ///
    /// # Examples
    ///
    /// ```
    /// use argdecl_core::{Factory, Value};
    ///
    /// let upper = Factory::custom(|text| Ok(Value::Str(text.to_uppercase())));
    /// assert_eq!(upper.convert("abc").unwrap(), Value::Str("ABC".into()));
    /// ```
    pub fn custom<F>(convert: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        Factory::Custom(Arc::new(convert))
    }

    /// Converts raw token text into a typed value.
    pub fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        match self {
            Factory::Type(ty) => ty.convert(text).ok_or_else(|| ConversionError {
                text: text.to_string(),
                tried: vec![ty.clone()],
            }),
            Factory::FirstOf(members) => {
                for member in members {
                    if let Some(value) = member.convert(text) {
                        return Ok(value);
                    }
                }
                Err(ConversionError {
                    text: text.to_string(),
                    tried: members.clone(),
                })
            }
            Factory::Custom(convert) => convert(text),
        }
    }

    /// Whether this factory is exactly the boolean constructor.
    ///
    /// Drives the `store-true` coercion during spec finalization; unions
    /// that merely contain `bool` do not qualify.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Factory::Type(ScalarType::Bool))
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factory::Type(ty) => write!(f, "Type({ty})"),
            Factory::FirstOf(members) => write!(f, "FirstOf({})", format_tried(members)),
            Factory::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Resolves a declared type into a conversion factory and a `required`
/// override.
///
/// - An explicit factory is used verbatim.
/// - A missing declared type falls back to the explicit factory, or to
///   the string constructor when none was given.
/// - An optional type lowers `required` to `false` and unwraps to its
///   inner type; a single remaining member becomes its constructor
///   directly.
/// - A union of two or more members becomes a first-success trial.
/// - A plain concrete type becomes its constructor; `required` is left
///   unset for the caller to decide from default presence.
///
/// # Examples
///
/// ```
/// use argdecl_core::{resolve_type, ScalarType, TypeRef, Value};
///
/// let either = TypeRef::Union(vec![ScalarType::Int, ScalarType::Str]);
/// let (factory, required) = resolve_type(Some(&either), None);
///
/// assert_eq!(required, None);
/// assert_eq!(factory.convert("5").unwrap(), Value::Int(5));
/// assert_eq!(factory.convert("abc").unwrap(), Value::Str("abc".into()));
/// ```
pub fn resolve_type(
    declared: Option<&TypeRef>,
    explicit: Option<Factory>,
) -> (Factory, Option<bool>) {
    let required = match declared {
        Some(TypeRef::Optional(_)) => Some(false),
        _ => None,
    };

    if let Some(factory) = explicit {
        return (factory, required);
    }

    let factory = match declared {
        Some(ty) => factory_for(ty),
        None => Factory::Type(ScalarType::Str),
    };
    (factory, required)
}

fn factory_for(ty: &TypeRef) -> Factory {
    match ty {
        TypeRef::Scalar(scalar) => Factory::Type(scalar.clone()),
        TypeRef::Optional(inner) => factory_for(inner),
        TypeRef::Union(members) if members.len() == 1 => Factory::Type(members[0].clone()),
        TypeRef::Union(members) => Factory::FirstOf(members.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_type_resolves_to_its_constructor() {
        let declared = TypeRef::Scalar(ScalarType::Int);
        let (factory, required) = resolve_type(Some(&declared), None);

        assert_eq!(required, None);
        assert_eq!(factory.convert("7").unwrap(), Value::Int(7));
    }

    #[test]
    fn test_optional_int_lowers_required_and_unwraps() {
        let declared = TypeRef::Optional(Box::new(TypeRef::Scalar(ScalarType::Int)));
        let (factory, required) = resolve_type(Some(&declared), None);

        assert_eq!(required, Some(false));
        assert_eq!(factory.convert("42").unwrap(), Value::Int(42));

        let err = factory.convert("x").unwrap_err();
        assert_eq!(err.text, "x");
        assert_eq!(err.tried, vec![ScalarType::Int]);
    }

    #[test]
    fn test_union_trial_follows_declaration_order() {
        let declared = TypeRef::Union(vec![ScalarType::Int, ScalarType::Str]);
        let (factory, _) = resolve_type(Some(&declared), None);

        assert_eq!(factory.convert("5").unwrap(), Value::Int(5));
        assert_eq!(factory.convert("abc").unwrap(), Value::Str("abc".into()));
        // Order is the contract: int wins for text both members accept.
        assert_eq!(factory.convert("007").unwrap(), Value::Int(7));
    }

    #[test]
    fn test_union_exhaustion_reports_all_attempts() {
        let declared = TypeRef::Union(vec![ScalarType::Int, ScalarType::Float]);
        let (factory, _) = resolve_type(Some(&declared), None);

        let err = factory.convert("many").unwrap_err();
        assert_eq!(err.tried, vec![ScalarType::Int, ScalarType::Float]);
        assert!(err.to_string().contains("\"many\""));
        assert!(err.to_string().contains("int, float"));
    }

    #[test]
    fn test_optional_union_keeps_trial_factory() {
        let declared = TypeRef::Optional(Box::new(TypeRef::Union(vec![
            ScalarType::Int,
            ScalarType::Str,
        ])));
        let (factory, required) = resolve_type(Some(&declared), None);

        assert_eq!(required, Some(false));
        assert_eq!(factory.convert("9").unwrap(), Value::Int(9));
    }

    #[test]
    fn test_explicit_factory_wins_over_declared_type() {
        let declared = TypeRef::Scalar(ScalarType::Int);
        let custom = Factory::custom(|text| Ok(Value::Str(format!("<{text}>"))));
        let (factory, _) = resolve_type(Some(&declared), Some(custom));

        assert_eq!(factory.convert("5").unwrap(), Value::Str("<5>".into()));
    }

    #[test]
    fn test_missing_type_falls_back_to_str() {
        let (factory, required) = resolve_type(None, None);

        assert_eq!(required, None);
        assert_eq!(factory.convert("raw").unwrap(), Value::Str("raw".into()));
    }

    #[test]
    fn test_is_boolean_only_for_exact_bool() {
        assert!(Factory::Type(ScalarType::Bool).is_boolean());
        assert!(!Factory::Type(ScalarType::Int).is_boolean());
        assert!(!Factory::FirstOf(vec![ScalarType::Bool, ScalarType::Str]).is_boolean());
    }
}
