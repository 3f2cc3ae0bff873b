//! Building argument specs from field declarations.
//!
//! [`SpecBuilder`] is the seam between a field declaration and its
//! resolved [`ArgumentSpec`]; the provided [`ArgumentSpecBuilder`]
//! implements the standard resolution: docstring help, synthesized or
//! metadata-supplied flags, type resolution, and metadata overrides.
//! [`build_specs`] walks a schema's declarations through a builder and
//! drops suppressed fields.

use crate::resolve::{Factory, resolve_type};
use crate::schema::Schema;
use crate::spec::ArgumentSpec;
use crate::types::{FieldDeclaration, HelpText, Metadata};

/// Builds one argument spec from one field declaration.
///
/// Implement this to give a field kind its own spec-building behavior;
/// [`ArgumentSpecBuilder`] covers the standard resolution. Returning
/// `None` excludes the field from parser construction.
pub trait SpecBuilder {
    /// Combines a declaration with type resolution and metadata
    /// overrides into a finished spec, or `None` for a suppressed field.
    fn build_spec(
        &self,
        name: &str,
        decl: &FieldDeclaration,
        factory: Option<Factory>,
    ) -> Option<ArgumentSpec>;
}

/// The standard spec builder.
///
/// - Help comes from the declaration docstring (empty when absent).
/// - Flags come from the first metadata annotation that supplies them,
///   else one default flag is synthesized: `--` plus the field name with
///   underscores turned into dashes.
/// - The conversion factory and the optional-type `required` override
///   come from [`resolve_type`]; an explicit metadata factory wins over
///   the `factory` argument.
/// - Remaining metadata overrides (`default`, `help`, `required`,
///   `action`, `nargs`, conflict tag) are applied by direct field
///   assignment, later annotations winning.
/// - A field whose *first* annotation carries the suppression marker is
///   excluded entirely.
///
/// # Examples
///
/// ```
/// use argdecl_core::{
///     ArgumentSpecBuilder, FieldDeclaration, ScalarType, SpecBuilder, TypeRef,
/// };
///
/// let decl = FieldDeclaration::new("max_depth", TypeRef::Scalar(ScalarType::Int))
///     .with_doc("Maximum recursion depth");
/// let spec = ArgumentSpecBuilder.build_spec("max_depth", &decl, None).unwrap();
///
/// assert_eq!(spec.flags, vec!["--max-depth".to_string()]);
/// assert_eq!(spec.help.render(), "Maximum recursion depth");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentSpecBuilder;

impl SpecBuilder for ArgumentSpecBuilder {
    fn build_spec(
        &self,
        name: &str,
        decl: &FieldDeclaration,
        factory: Option<Factory>,
    ) -> Option<ArgumentSpec> {
        if decl.annotations.first().is_some_and(|m| m.suppress) {
            return None;
        }

        let merged = Metadata::merged(&decl.annotations);

        let flags = merged
            .flags
            .unwrap_or_else(|| vec![format!("--{}", name.replace('_', "-"))]);

        let explicit = merged.factory.or(factory);
        let (resolved, required_override) = resolve_type(decl.ty.as_ref(), explicit);

        let mut spec = ArgumentSpec {
            name: name.to_string(),
            flags,
            factory: resolved,
            default: decl.default.clone(),
            help: HelpText::Text(decl.doc.clone()),
            required: required_override,
            action: None,
            nargs: None,
            conflicts: None,
        };

        if let Some(default) = merged.default {
            spec.default = Some(default);
        }
        if let Some(help) = merged.help {
            spec.help = help;
        }
        if let Some(required) = merged.required {
            spec.required = Some(required);
        }
        spec.action = merged.action;
        spec.nargs = merged.nargs;
        spec.conflicts = merged.conflicts;

        Some(spec)
    }
}

/// Builds the argument specs for a schema with the standard builder.
///
/// Suppressed fields are dropped; declaration order is preserved.
pub fn build_specs<S: Schema>() -> Vec<ArgumentSpec> {
    build_specs_with::<S>(&ArgumentSpecBuilder)
}

/// Builds the argument specs for a schema with a caller-chosen builder.
pub fn build_specs_with<S: Schema>(builder: &dyn SpecBuilder) -> Vec<ArgumentSpec> {
    S::fields()
        .iter()
        .filter_map(|decl| builder.build_spec(&decl.name, decl, None))
        .collect()
}
