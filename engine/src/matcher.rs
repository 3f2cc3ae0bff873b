//! Token matching against registered arguments.
//!
//! Implements the parse pass: flag lookup (`--flag value` and
//! `--flag=value` forms), positional assignment in declaration order,
//! arity-aware value consumption, exclusive-group conflicts, defaults
//! for unseen arguments, and required-argument checks. Unrecognized
//! flags and surplus positionals are returned as leftover tokens, never
//! errors.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use argdecl_core::{ActionKind, Arity, EngineError, Namespace, Value};

use crate::parser::{ArgParser, Registered};

/// A dash-led token that is a numeric value, not a flag (`-3`, `-0.5`).
static NEGATIVE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\d+$|^-\d*\.\d+$").expect("static regex must compile"));

fn is_flag_token(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && !NEGATIVE_NUMBER.is_match(token)
}

fn convert(reg: &Registered, flag: &str, text: &str) -> Result<Value, EngineError> {
    match &reg.args.factory {
        Some(factory) => factory
            .convert(text)
            .map_err(|source| EngineError::InvalidValue {
                flag: flag.to_string(),
                source,
            }),
        None => Ok(Value::Str(text.to_string())),
    }
}

pub(crate) fn match_tokens(
    parser: &ArgParser,
    tokens: &[String],
    ns: &mut Namespace,
) -> Result<Vec<String>, EngineError> {
    let mut leftover = Vec::new();
    let mut seen: HashSet<usize> = HashSet::new();
    let mut group_first: HashMap<usize, usize> = HashMap::new();
    let mut next_positional = 0usize;
    let mut only_positionals = false;
    let mut i = 0usize;

    while i < tokens.len() {
        let token = &tokens[i];
        i += 1;

        if !only_positionals && token == "--" {
            only_positionals = true;
            continue;
        }

        if !only_positionals && is_flag_token(token) {
            let (flag, inline) = match token.split_once('=') {
                Some((flag, value)) => (flag, Some(value)),
                None => (token.as_str(), None),
            };

            let Some(&index) = parser.flag_index.get(flag) else {
                leftover.push(token.clone());
                continue;
            };
            let reg = &parser.args[index];

            check_conflict(parser, &mut group_first, index, flag)?;
            seen.insert(index);

            match reg.args.action {
                ActionKind::StoreTrue => {
                    if inline.is_some() {
                        return Err(EngineError::UnexpectedValue(flag.to_string()));
                    }
                    ns.insert(reg.dest(), Value::Bool(true));
                }
                ActionKind::Count => {
                    if inline.is_some() {
                        return Err(EngineError::UnexpectedValue(flag.to_string()));
                    }
                    let next = match ns.get(reg.dest()) {
                        Some(Value::Int(n)) => n + 1,
                        _ => 1,
                    };
                    ns.insert(reg.dest(), Value::Int(next));
                }
                ActionKind::Store => {
                    if let Some(value) = consume_value(reg, flag, inline, tokens, &mut i)? {
                        ns.insert(reg.dest(), value);
                    }
                }
                ActionKind::Append => {
                    if let Some(value) = consume_value(reg, flag, inline, tokens, &mut i)? {
                        match ns.get_mut(reg.dest()) {
                            Some(Value::List(items)) => items.push(value),
                            _ => {
                                ns.insert(reg.dest(), Value::List(vec![value]));
                            }
                        }
                    }
                }
            }
            continue;
        }

        // Positional candidate.
        let Some(&index) = parser.positional_order.get(next_positional) else {
            leftover.push(token.clone());
            continue;
        };
        next_positional += 1;
        let reg = &parser.args[index];
        seen.insert(index);

        match reg.args.nargs {
            Some(Arity::ZeroOrMore | Arity::OneOrMore) => {
                let mut items = vec![convert(reg, reg.dest(), token)?];
                while i < tokens.len() && (only_positionals || !is_flag_token(&tokens[i])) {
                    items.push(convert(reg, reg.dest(), &tokens[i])?);
                    i += 1;
                }
                ns.insert(reg.dest(), Value::List(items));
            }
            Some(Arity::Exactly(n)) if n > 0 => {
                let mut items = vec![convert(reg, reg.dest(), token)?];
                while items.len() < n {
                    if i >= tokens.len() || (!only_positionals && is_flag_token(&tokens[i])) {
                        return Err(EngineError::MissingValue(reg.dest().to_string()));
                    }
                    items.push(convert(reg, reg.dest(), &tokens[i])?);
                    i += 1;
                }
                ns.insert(reg.dest(), Value::List(items));
            }
            _ => {
                ns.insert(reg.dest(), convert(reg, reg.dest(), token)?);
            }
        }
    }

    finish(parser, &seen, ns)?;
    debug!(prog = %parser.prog(), leftover = leftover.len(), "parse complete");
    Ok(leftover)
}

/// Consumes the value tokens for one flag occurrence.
///
/// Returns `None` when a `?`-arity flag found no value to consume; the
/// destination then stays unset and the default pass covers it.
fn consume_value(
    reg: &Registered,
    flag: &str,
    inline: Option<&str>,
    tokens: &[String],
    i: &mut usize,
) -> Result<Option<Value>, EngineError> {
    if let Some(text) = inline {
        if matches!(reg.args.nargs, Some(Arity::Exactly(n)) if n != 1) {
            return Err(EngineError::MissingValue(flag.to_string()));
        }
        let value = convert(reg, flag, text)?;
        return Ok(Some(match reg.args.nargs {
            Some(Arity::Exactly(_) | Arity::ZeroOrMore | Arity::OneOrMore) => {
                Value::List(vec![value])
            }
            _ => value,
        }));
    }

    let value_available = |at: usize| at < tokens.len() && !is_flag_token(&tokens[at]);

    match reg.args.nargs {
        None => {
            if !value_available(*i) {
                return Err(EngineError::MissingValue(flag.to_string()));
            }
            let value = convert(reg, flag, &tokens[*i])?;
            *i += 1;
            Ok(Some(value))
        }
        Some(Arity::Optional) => {
            if !value_available(*i) {
                return Ok(None);
            }
            let value = convert(reg, flag, &tokens[*i])?;
            *i += 1;
            Ok(Some(value))
        }
        Some(Arity::Exactly(n)) => {
            let mut items = Vec::with_capacity(n);
            while items.len() < n {
                if !value_available(*i) {
                    return Err(EngineError::MissingValue(flag.to_string()));
                }
                items.push(convert(reg, flag, &tokens[*i])?);
                *i += 1;
            }
            Ok(Some(Value::List(items)))
        }
        Some(Arity::ZeroOrMore | Arity::OneOrMore) => {
            let mut items = Vec::new();
            while value_available(*i) {
                items.push(convert(reg, flag, &tokens[*i])?);
                *i += 1;
            }
            if items.is_empty() && reg.args.nargs == Some(Arity::OneOrMore) {
                return Err(EngineError::MissingValue(flag.to_string()));
            }
            Ok(Some(Value::List(items)))
        }
    }
}

fn check_conflict(
    parser: &ArgParser,
    group_first: &mut HashMap<usize, usize>,
    index: usize,
    flag: &str,
) -> Result<(), EngineError> {
    let Some(group) = parser.args[index].group else {
        return Ok(());
    };
    match group_first.get(&group) {
        Some(&first) if first != index => Err(EngineError::Conflict {
            flag: flag.to_string(),
            other: parser.args[first].args.display_name().to_string(),
        }),
        _ => {
            group_first.insert(group, index);
            Ok(())
        }
    }
}

/// Applies defaults for unseen destinations and enforces required
/// arguments.
fn finish(parser: &ArgParser, seen: &HashSet<usize>, ns: &mut Namespace) -> Result<(), EngineError> {
    for (index, reg) in parser.args.iter().enumerate() {
        if ns.contains(reg.dest()) {
            continue;
        }
        if let Some(default) = &reg.args.default {
            ns.insert(reg.dest(), default.clone());
        } else if reg.is_required() && !seen.contains(&index) {
            return Err(EngineError::MissingRequired(
                reg.args.display_name().to_string(),
            ));
        }
    }
    Ok(())
}
