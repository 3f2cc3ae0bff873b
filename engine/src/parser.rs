//! Parser state: argument registration and exclusive groups.
//!
//! [`ArgParser`] holds the registered arguments, a flag lookup index,
//! positional ordering, and exclusive-group membership. Registration
//! validates flag formats (dash rules, duplicates) before the argument
//! is accepted; token matching lives in the `matcher` module.

use std::collections::HashMap;

use tracing::debug;

use argdecl_core::{Arity, EngineError, Namespace, ParserEngine, RegistrationArgs};

use crate::matcher;

/// Handle for one registered argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgHandle {
    /// Registration index within the parser.
    pub index: usize,
    /// Destination name values are stored under.
    pub dest: String,
}

/// Handle for one mutually-exclusive group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupHandle(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) struct Registered {
    pub(crate) args: RegistrationArgs,
    pub(crate) group: Option<usize>,
}

impl Registered {
    pub(crate) fn dest(&self) -> &str {
        self.args.destination()
    }

    pub(crate) fn is_positional(&self) -> bool {
        self.args.dest.is_none()
    }

    /// Whether absence of this argument is an error.
    ///
    /// An explicit `required` wins; otherwise only positionals are
    /// implicitly required, unless their arity tolerates zero values.
    pub(crate) fn is_required(&self) -> bool {
        match self.args.required {
            Some(required) => required,
            None => {
                self.is_positional()
                    && !matches!(self.args.nargs, Some(Arity::Optional | Arity::ZeroOrMore))
            }
        }
    }
}

/// Token-matching argument parser.
///
/// The reference implementation of the
/// [`ParserEngine`](argdecl_core::ParserEngine) contract: arguments are
/// registered up front (optionally inside exclusive groups), then
/// [`parse_known`](ParserEngine::parse_known) matches a token list,
/// fills a [`Namespace`] in place, and returns the tokens it did not
/// recognize.
///
/// # Examples
///
/// ```
/// use argdecl_core::{ActionKind, Namespace, ParserEngine, RegistrationArgs};
/// use argdecl_engine::ArgParser;
///
/// let mut parser = ArgParser::new("demo", "");
/// parser
///     .add_argument(RegistrationArgs {
///         flags: vec!["--verbose".into()],
///         help: String::new(),
///         dest: Some("verbose".into()),
///         factory: None,
///         default: Some(argdecl_core::Value::Bool(false)),
///         required: Some(false),
///         action: ActionKind::StoreTrue,
///         nargs: None,
///     })
///     .unwrap();
///
/// let mut ns = Namespace::new();
/// let leftover = parser
///     .parse_known(&["--verbose".to_string(), "extra".to_string()], &mut ns)
///     .unwrap();
///
/// assert_eq!(ns.get("verbose"), Some(&argdecl_core::Value::Bool(true)));
/// assert_eq!(leftover, vec!["extra".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArgParser {
    prog: String,
    description: String,
    pub(crate) args: Vec<Registered>,
    pub(crate) flag_index: HashMap<String, usize>,
    pub(crate) positional_order: Vec<usize>,
    pub(crate) groups: Vec<Vec<usize>>,
}

impl ArgParser {
    /// Creates an empty parser with a program name and description.
    pub fn new(prog: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            prog: prog.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Program name shown in usage output.
    pub fn prog(&self) -> &str {
        &self.prog
    }

    /// Program description shown in help output.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of registered arguments.
    pub fn argument_count(&self) -> usize {
        self.args.len()
    }

    /// Destination names in registration order.
    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(Registered::dest)
    }

    fn register(
        &mut self,
        args: RegistrationArgs,
        group: Option<usize>,
    ) -> Result<ArgHandle, EngineError> {
        self.validate(&args)?;

        let index = self.args.len();
        let dest = args.destination().to_string();

        for flag in &args.flags {
            if flag.starts_with('-') {
                self.flag_index.insert(flag.clone(), index);
            }
        }
        if args.dest.is_none() {
            self.positional_order.push(index);
        }
        if let Some(group) = group {
            self.groups[group].push(index);
        }

        debug!(prog = %self.prog, dest = %dest, "argument registered");
        self.args.push(Registered { args, group });
        Ok(ArgHandle { index, dest })
    }

    fn validate(&self, args: &RegistrationArgs) -> Result<(), EngineError> {
        if args.flags.is_empty() {
            return Err(EngineError::InvalidFlag("<empty>".to_string()));
        }

        if args.dest.is_none() {
            let name = &args.flags[0];
            if args.flags.len() != 1 || name.is_empty() || name.starts_with('-') {
                return Err(EngineError::InvalidFlag(name.clone()));
            }
            return Ok(());
        }

        for flag in &args.flags {
            let valid_short =
                flag.len() >= 2 && flag.starts_with('-') && !flag.starts_with("--");
            let valid_long = flag.len() >= 3 && flag.starts_with("--");
            if !valid_short && !valid_long {
                return Err(EngineError::InvalidFlag(flag.clone()));
            }
            if self.flag_index.contains_key(flag) {
                return Err(EngineError::DuplicateFlag(flag.clone()));
            }
        }
        Ok(())
    }
}

impl ParserEngine for ArgParser {
    type Handle = ArgHandle;
    type Group = GroupHandle;

    fn add_argument(&mut self, args: RegistrationArgs) -> Result<ArgHandle, EngineError> {
        self.register(args, None)
    }

    fn add_exclusive_group(&mut self) -> GroupHandle {
        self.groups.push(Vec::new());
        GroupHandle(self.groups.len() - 1)
    }

    fn add_group_argument(
        &mut self,
        group: &GroupHandle,
        args: RegistrationArgs,
    ) -> Result<ArgHandle, EngineError> {
        self.register(args, Some(group.0))
    }

    fn parse_known(
        &self,
        tokens: &[String],
        ns: &mut Namespace,
    ) -> Result<Vec<String>, EngineError> {
        matcher::match_tokens(self, tokens, ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argdecl_core::{ActionKind, Factory, ScalarType};

    fn flag_args(flags: &[&str], dest: &str) -> RegistrationArgs {
        RegistrationArgs {
            flags: flags.iter().map(|f| f.to_string()).collect(),
            help: String::new(),
            dest: Some(dest.to_string()),
            factory: Some(Factory::Type(ScalarType::Str)),
            default: None,
            required: Some(false),
            action: ActionKind::Store,
            nargs: None,
        }
    }

    #[test]
    fn test_registration_indexes_every_flag_alias() {
        let mut parser = ArgParser::new("t", "");
        let handle = parser
            .add_argument(flag_args(&["-o", "--output"], "output"))
            .unwrap();

        assert_eq!(handle.dest, "output");
        assert_eq!(parser.flag_index.get("-o"), Some(&0));
        assert_eq!(parser.flag_index.get("--output"), Some(&0));
    }

    #[test]
    fn test_duplicate_flag_is_rejected() {
        let mut parser = ArgParser::new("t", "");
        parser.add_argument(flag_args(&["--output"], "output")).unwrap();

        let err = parser
            .add_argument(flag_args(&["--output"], "other"))
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateFlag("--output".to_string()));
    }

    #[test]
    fn test_invalid_flag_formats_are_rejected() {
        let mut parser = ArgParser::new("t", "");

        let bare = parser.add_argument(flag_args(&["output"], "output"));
        assert_eq!(bare, Err(EngineError::InvalidFlag("output".to_string())));

        let dash_only = parser.add_argument(flag_args(&["--"], "sep"));
        assert_eq!(dash_only, Err(EngineError::InvalidFlag("--".to_string())));
    }

    #[test]
    fn test_positional_keeps_flag_text_as_destination() {
        let mut parser = ArgParser::new("t", "");
        let mut args = flag_args(&["name"], "ignored");
        args.dest = None;
        args.required = None;

        let handle = parser.add_argument(args).unwrap();
        assert_eq!(handle.dest, "name");
        assert_eq!(parser.positional_order, vec![0]);
        assert!(parser.flag_index.is_empty());
    }

    #[test]
    fn test_group_membership_is_recorded() {
        let mut parser = ArgParser::new("t", "");
        let group = parser.add_exclusive_group();
        parser
            .add_group_argument(&group, flag_args(&["--json"], "json"))
            .unwrap();
        parser
            .add_group_argument(&group, flag_args(&["--yaml"], "yaml"))
            .unwrap();

        assert_eq!(parser.groups, vec![vec![0, 1]]);
        assert_eq!(parser.args[0].group, Some(0));
    }

    #[test]
    fn test_required_derivation_for_positionals() {
        let mut required = flag_args(&["name"], "ignored");
        required.dest = None;
        required.required = None;
        let reg = Registered {
            args: required,
            group: None,
        };
        assert!(reg.is_required());

        let mut optional = reg.clone();
        optional.args.nargs = Some(Arity::ZeroOrMore);
        assert!(!optional.is_required());
    }
}
