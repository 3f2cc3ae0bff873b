//! Resolved argument specs and engine-facing finalization.
//!
//! An [`ArgumentSpec`] is the fully resolved description of one CLI
//! argument: flags, conversion factory, default, help, and overrides.
//! [`ArgumentSpec::registration_args`] applies the finalization rules
//! that turn a spec into the [`RegistrationArgs`] handed to the parsing
//! engine.

use crate::resolve::Factory;
use crate::types::{ActionKind, Arity, HelpText, Value};

/// Fully resolved description of one CLI argument, ready for engine
/// registration.
///
/// Built by the spec builder from a field declaration; a stateless value
/// object thereafter. The first flag is canonical.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    /// Destination field name.
    pub name: String,
    /// Flag aliases; at least one, first is canonical.
    pub flags: Vec<String>,
    /// Conversion factory. Not consulted by the engine for no-value
    /// actions.
    pub factory: Factory,
    /// Default value, if the field declared one.
    pub default: Option<Value>,
    /// Help text.
    pub help: HelpText,
    /// Explicit required override; `None` resolves from default presence.
    pub required: Option<bool>,
    /// Storage action; `None` resolves to store (or store-true for
    /// boolean fields).
    pub action: Option<ActionKind>,
    /// Arity, when the field consumes a non-default number of values.
    pub nargs: Option<Arity>,
    /// Conflict tag placing the field in an exclusive group.
    pub conflicts: Option<String>,
}

impl ArgumentSpec {
    /// The canonical flag (the first alias).
    pub fn canonical_flag(&self) -> &str {
        &self.flags[0]
    }

    /// Whether the spec describes a positional argument: exactly one
    /// flag that does not start with the flag prefix.
    pub fn is_positional(&self) -> bool {
        self.flags.len() == 1 && !self.flags[0].starts_with('-')
    }

    /// The conflict tag, if non-empty.
    pub fn conflict_tag(&self) -> Option<&str> {
        self.conflicts.as_deref().filter(|tag| !tag.is_empty())
    }

    /// Finalizes this spec into engine registration arguments.
    ///
    /// - `nargs` and a present default pass straight through.
    /// - A boolean field with no explicit action becomes `store-true`;
    ///   a `store-true` argument without a default gets `false`.
    /// - The factory is only passed for value-consuming actions.
    /// - A positional argument carries no destination override; the
    ///   engine derives it from the flag text.
    /// - An explicit `required` passes through; otherwise a flag
    ///   argument is required exactly when it has no default.
    ///
    /// Boolean coercion must run before the required derivation: a
    /// boolean field without an explicit default ends up optional with
    /// default `false`, never required.
    ///
    /// # Examples
    ///
    /// ```
    /// use argdecl_core::{ActionKind, ArgumentSpec, Factory, ScalarType, Value};
    ///
    /// let spec = ArgumentSpec {
    ///     name: "verbose".into(),
    ///     flags: vec!["--verbose".into()],
    ///     factory: Factory::Type(ScalarType::Bool),
    ///     default: None,
    ///     help: "Enable verbose output".into(),
    ///     required: None,
    ///     action: None,
    ///     nargs: None,
    ///     conflicts: None,
    /// };
    ///
    /// let args = spec.registration_args();
    /// assert_eq!(args.action, ActionKind::StoreTrue);
    /// assert_eq!(args.default, Some(Value::Bool(false)));
    /// assert_eq!(args.required, Some(false));
    /// assert!(args.factory.is_none());
    /// ```
    pub fn registration_args(&self) -> RegistrationArgs {
        let mut action = self.action.unwrap_or_default();
        if self.action.is_none() && self.factory.is_boolean() {
            action = ActionKind::StoreTrue;
        }

        let mut default = self.default.clone();
        if action == ActionKind::StoreTrue && default.is_none() {
            default = Some(Value::Bool(false));
        }

        let factory = match action {
            ActionKind::StoreTrue | ActionKind::Count => None,
            ActionKind::Store | ActionKind::Append => Some(self.factory.clone()),
        };

        let dest = if self.is_positional() {
            None
        } else {
            Some(self.name.clone())
        };

        let required = match self.required {
            Some(explicit) => Some(explicit),
            None => dest.as_ref().map(|_| default.is_none()),
        };

        RegistrationArgs {
            flags: self.flags.clone(),
            help: self.help.render(),
            dest,
            factory,
            default,
            required,
            action,
            nargs: self.nargs,
        }
    }
}

/// Finalized arguments for one engine registration call.
///
/// The engine-facing counterpart of an [`ArgumentSpec`], with every
/// resolution rule already applied.
#[derive(Debug, Clone)]
pub struct RegistrationArgs {
    /// Flag aliases, or the bare name of a positional argument.
    pub flags: Vec<String>,
    /// Rendered help text.
    pub help: String,
    /// Destination override; `None` means positional, the engine derives
    /// the destination from the flag text itself.
    pub dest: Option<String>,
    /// Conversion factory; `None` for no-value actions.
    pub factory: Option<Factory>,
    /// Default applied when the argument is absent.
    pub default: Option<Value>,
    /// Whether the argument must be supplied; `None` leaves the decision
    /// to the engine (positionals).
    pub required: Option<bool>,
    /// Resolved storage action.
    pub action: ActionKind,
    /// Number of value tokens consumed per occurrence.
    pub nargs: Option<Arity>,
}

impl RegistrationArgs {
    /// The destination name values are stored under.
    pub fn destination(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.flags[0])
    }

    /// The name shown in user-facing errors (the canonical flag).
    pub fn display_name(&self) -> &str {
        &self.flags[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarType;

    fn spec(name: &str, flags: &[&str], factory: Factory) -> ArgumentSpec {
        ArgumentSpec {
            name: name.into(),
            flags: flags.iter().map(|f| f.to_string()).collect(),
            factory,
            default: None,
            help: HelpText::default(),
            required: None,
            action: None,
            nargs: None,
            conflicts: None,
        }
    }

    #[test]
    fn test_boolean_coercion_precedes_required_derivation() {
        let args = spec("verbose", &["--verbose"], Factory::Type(ScalarType::Bool))
            .registration_args();

        assert_eq!(args.action, ActionKind::StoreTrue);
        assert_eq!(args.default, Some(Value::Bool(false)));
        assert_eq!(args.required, Some(false));
    }

    #[test]
    fn test_explicit_action_is_not_overridden() {
        let mut bool_spec = spec("level", &["--level"], Factory::Type(ScalarType::Bool));
        bool_spec.action = Some(ActionKind::Count);

        let args = bool_spec.registration_args();
        assert_eq!(args.action, ActionKind::Count);
        assert!(args.factory.is_none());
        // No store-true in effect, so no forced default either.
        assert_eq!(args.default, None);
    }

    #[test]
    fn test_flag_without_default_is_required() {
        let args = spec("count", &["--count"], Factory::Type(ScalarType::Int))
            .registration_args();

        assert_eq!(args.dest.as_deref(), Some("count"));
        assert_eq!(args.required, Some(true));
        assert!(args.factory.is_some());
    }

    #[test]
    fn test_flag_with_default_is_optional() {
        let mut with_default = spec("count", &["--count"], Factory::Type(ScalarType::Int));
        with_default.default = Some(Value::Int(1));

        let args = with_default.registration_args();
        assert_eq!(args.required, Some(false));
        assert_eq!(args.default, Some(Value::Int(1)));
    }

    #[test]
    fn test_explicit_required_passes_through() {
        let mut explicit = spec("count", &["--count"], Factory::Type(ScalarType::Int));
        explicit.default = Some(Value::Int(1));
        explicit.required = Some(true);

        let args = explicit.registration_args();
        assert_eq!(args.required, Some(true));
    }

    #[test]
    fn test_positional_has_no_destination_or_required() {
        let args = spec("name", &["name"], Factory::Type(ScalarType::Str)).registration_args();

        assert!(args.dest.is_none());
        assert_eq!(args.required, None);
        assert_eq!(args.destination(), "name");
    }

    #[test]
    fn test_nargs_passes_through() {
        let mut listy = spec("items", &["--items"], Factory::Type(ScalarType::Str));
        listy.nargs = Some(Arity::OneOrMore);

        let args = listy.registration_args();
        assert_eq!(args.nargs, Some(Arity::OneOrMore));
    }

    #[test]
    fn test_empty_conflict_tag_is_ignored() {
        let mut tagged = spec("quiet", &["--quiet"], Factory::Type(ScalarType::Bool));
        tagged.conflicts = Some(String::new());
        assert_eq!(tagged.conflict_tag(), None);

        tagged.conflicts = Some("verbosity".into());
        assert_eq!(tagged.conflict_tag(), Some("verbosity"));
    }
}
