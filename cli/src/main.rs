//! Demonstration binary: a `fetch`-style CLI declared as an argdecl
//! schema.
//!
//! Parses its own argv through the reference engine and prints the
//! typed result in the requested output format. Exercises positionals,
//! defaults, optional types, choices, repeated flags, and an exclusive
//! verbosity group.

use std::process;

use serde::Serialize;

use argdecl_core::{
    ActionKind, ConstructionError, FieldDeclaration, Metadata, Namespace, ScalarType, Schema,
    TypeRef, Value,
};
use argdecl_engine::build_parser;

#[derive(Debug, Serialize)]
struct Fetch {
    url: String,
    retries: i64,
    timeout: Option<f64>,
    format: String,
    headers: Vec<String>,
    verbose: bool,
    quiet: bool,
}

impl Schema for Fetch {
    fn name() -> &'static str {
        "argdecl"
    }

    fn description() -> &'static str {
        "Fetch a resource and print the parsed invocation"
    }

    fn fields() -> Vec<FieldDeclaration> {
        vec![
            FieldDeclaration::new("url", TypeRef::Scalar(ScalarType::Str))
                .with_metadata(Metadata::flags(["url"]))
                .with_doc("URL to fetch"),
            FieldDeclaration::new("retries", TypeRef::Scalar(ScalarType::Int))
                .with_default(Value::Int(3))
                .with_doc("Number of retry attempts"),
            FieldDeclaration::new(
                "timeout",
                TypeRef::Optional(Box::new(TypeRef::Scalar(ScalarType::Float))),
            )
            .with_doc("Request timeout in seconds"),
            FieldDeclaration::new(
                "format",
                TypeRef::Scalar(ScalarType::Choice(vec!["json".into(), "yaml".into()])),
            )
            .with_default(Value::Str("json".into()))
            .with_doc("Output format for the parsed result"),
            FieldDeclaration::new("headers", TypeRef::Scalar(ScalarType::Str))
                .with_metadata(
                    Metadata::flags(["-H", "--header"])
                        .with_action(ActionKind::Append)
                        .with_required(false),
                )
                .with_doc("Extra request header; repeatable"),
            FieldDeclaration::new("verbose", TypeRef::Scalar(ScalarType::Bool))
                .with_metadata(Metadata::new().with_conflicts("verbosity"))
                .with_doc("Chatty progress output"),
            FieldDeclaration::new("quiet", TypeRef::Scalar(ScalarType::Bool))
                .with_metadata(Metadata::new().with_conflicts("verbosity"))
                .with_doc("No progress output at all"),
        ]
    }

    fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
        let headers = match ns.take_value("headers") {
            Some(Value::List(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Str(s) => Ok(s),
                    other => Err(ConstructionError::TypeMismatch {
                        field: "headers".into(),
                        expected: "str",
                        found: other.kind(),
                    }),
                })
                .collect::<Result<_, _>>()?,
            _ => Vec::new(),
        };

        Ok(Self {
            url: ns.take_string("url")?,
            retries: ns.take_int("retries")?,
            timeout: ns.take_opt_float("timeout")?,
            format: ns.take_string("format")?,
            headers,
            verbose: ns.take_bool("verbose")?,
            quiet: ns.take_bool("quiet")?,
        })
    }
}

fn main() {
    let tokens: Vec<String> = std::env::args().skip(1).collect();

    let parser = match build_parser::<Fetch>() {
        Ok(parser) => parser,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };

    if tokens.iter().any(|t| t == "--help" || t == "-h") {
        print!("{}", parser.engine().render_help());
        return;
    }

    let fetch = match parser.parse(tokens) {
        Ok(fetch) => fetch,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };

    let rendered = match fetch.format.as_str() {
        "yaml" => serde_yaml::to_string(&fetch).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(&fetch).map_err(|e| e.to_string()),
    };

    match rendered {
        Ok(text) => println!("{text}"),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}
