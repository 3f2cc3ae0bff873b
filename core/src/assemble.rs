//! Assembling schemas against a parsing engine.
//!
//! [`assemble`] registers a schema's argument specs with an engine —
//! idempotently, so layered schema hierarchies can run the same
//! assembly more than once without duplicate flags — and caches the
//! resulting action handles in an explicit [`SchemaRegistry`].
//! [`SchemaParser`] wraps an assembled engine and reconstructs typed
//! instances from its parse output.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use thiserror::Error;
use tracing::debug;

use crate::build::build_specs;
use crate::engine::{EngineError, ParserEngine};
use crate::schema::{ConstructionError, Namespace, Schema};

/// Per-schema registry of engine action handles, keyed by destination
/// name.
///
/// Populated during assembly and consulted to skip destinations that
/// are already registered; also available for introspection afterwards.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry<H> {
    handles: BTreeMap<String, H>,
}

impl<H> SchemaRegistry<H> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            handles: BTreeMap::new(),
        }
    }

    /// Whether a destination already has a registered handle.
    pub fn contains(&self, dest: &str) -> bool {
        self.handles.contains_key(dest)
    }

    /// Looks up the handle registered for a destination.
    pub fn get(&self, dest: &str) -> Option<&H> {
        self.handles.get(dest)
    }

    /// Records the handle for a destination.
    pub fn insert(&mut self, dest: impl Into<String>, handle: H) {
        self.handles.insert(dest.into(), handle);
    }

    /// Registered destination names, in order.
    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    /// Number of registered destinations.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Exclusive-group handles, one per conflict tag.
///
/// Groups are created lazily on first use of a tag and reused for every
/// later field carrying the same tag.
#[derive(Debug, Clone, Default)]
pub struct ExclusiveGroups<G> {
    groups: BTreeMap<String, G>,
}

impl<G> ExclusiveGroups<G> {
    /// Creates an empty group registry.
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    /// Returns the group for a tag, creating it with `create` on first
    /// use.
    pub fn group_for(&mut self, tag: &str, create: impl FnOnce() -> G) -> &G {
        self.groups.entry(tag.to_string()).or_insert_with(create)
    }

    /// Number of distinct tags seen.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group has been created yet.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Registers a schema's argument specs against an engine.
///
/// For each spec: a destination already present in `registry` is
/// skipped silently (idempotent assembly is an expected composition
/// pattern, not an error); a spec with a conflict tag registers into
/// that tag's exclusive group, lazily created; everything else registers
/// at the parser's top-level scope. Handles land in `registry`.
pub fn assemble<S, E>(
    engine: &mut E,
    registry: &mut SchemaRegistry<E::Handle>,
    groups: &mut ExclusiveGroups<E::Group>,
) -> Result<(), EngineError>
where
    S: Schema,
    E: ParserEngine,
{
    for spec in build_specs::<S>() {
        let args = spec.registration_args();
        let dest = args.destination().to_string();
        if registry.contains(&dest) {
            debug!(schema = S::name(), dest = %dest, "destination already registered, skipping");
            continue;
        }

        let handle = match spec.conflict_tag() {
            Some(tag) => {
                let group = groups.group_for(tag, || engine.add_exclusive_group());
                engine.add_group_argument(group, args)?
            }
            None => engine.add_argument(args)?,
        };
        debug!(schema = S::name(), dest = %dest, "registered argument");
        registry.insert(dest, handle);
    }
    Ok(())
}

/// Failure modes of a full parse-and-construct cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The engine rejected the token list.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The parsed values could not construct the schema instance.
    #[error(transparent)]
    Construction(#[from] ConstructionError),
    /// Strict parsing found tokens no argument matched.
    #[error("unrecognized tokens: {}", .0.join(" "))]
    UnrecognizedTokens(Vec<String>),
}

/// A parser for one schema type, wrapping an assembled engine.
///
/// Owns the engine and the registries produced by assembly; parsing
/// delegates to the engine and then invokes the schema's constructor on
/// the filled namespace. The schema type is carried by the type
/// parameter, never smuggled through the parsed data.
pub struct SchemaParser<S, E>
where
    S: Schema,
    E: ParserEngine,
{
    engine: E,
    registry: SchemaRegistry<E::Handle>,
    groups: ExclusiveGroups<E::Group>,
    _schema: PhantomData<S>,
}

impl<S, E> SchemaParser<S, E>
where
    S: Schema,
    E: ParserEngine,
{
    /// Assembles the schema into `engine` and wraps the result.
    pub fn new(mut engine: E) -> Result<Self, EngineError> {
        let mut registry = SchemaRegistry::new();
        let mut groups = ExclusiveGroups::new();
        assemble::<S, E>(&mut engine, &mut registry, &mut groups)?;
        Ok(Self {
            engine,
            registry,
            groups,
            _schema: PhantomData,
        })
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The destination-to-handle registry produced by assembly.
    pub fn registry(&self) -> &SchemaRegistry<E::Handle> {
        &self.registry
    }

    /// The exclusive groups created during assembly.
    pub fn groups(&self) -> &ExclusiveGroups<E::Group> {
        &self.groups
    }

    /// Parses tokens, returning the typed instance and leftover tokens.
    pub fn parse_known<I, T>(&self, tokens: I) -> Result<(S, Vec<String>), ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.parse_known_with(tokens, Namespace::new())
    }

    /// Parses tokens into a pre-seeded namespace.
    ///
    /// Entries already present count as parsed values; the engine only
    /// overwrites destinations it matches or defaults.
    pub fn parse_known_with<I, T>(
        &self,
        tokens: I,
        mut ns: Namespace,
    ) -> Result<(S, Vec<String>), ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let leftover = self.engine.parse_known(&tokens, &mut ns)?;
        let instance = S::from_namespace(&mut ns)?;
        Ok((instance, leftover))
    }

    /// Parses tokens strictly: leftover tokens are an error.
    pub fn parse<I, T>(&self, tokens: I) -> Result<S, ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let (instance, leftover) = self.parse_known(tokens)?;
        if leftover.is_empty() {
            Ok(instance)
        } else {
            Err(ParseError::UnrecognizedTokens(leftover))
        }
    }
}
