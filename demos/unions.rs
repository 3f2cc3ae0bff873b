//! Union and optional type example.
//!
//! A union field tries each member type in declaration order and keeps
//! the first successful conversion; an optional field lowers `required`
//! without needing a default. Both are demonstrated against several
//! token lists, including a failing conversion.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argdecl-demos --example unions
//! ```

use argdecl_core::{
    ConstructionError, FieldDeclaration, Namespace, ScalarType, Schema, TypeRef, Value,
};
use argdecl_engine::build_parser;

#[derive(Debug)]
struct Lookup {
    id: Value,
    timeout: Option<f64>,
}

impl Schema for Lookup {
    fn name() -> &'static str {
        "lookup"
    }

    fn fields() -> Vec<FieldDeclaration> {
        vec![
            FieldDeclaration::new("id", TypeRef::Union(vec![ScalarType::Int, ScalarType::Str]))
                .with_doc("Numeric id or symbolic name"),
            FieldDeclaration::new(
                "timeout",
                TypeRef::Optional(Box::new(TypeRef::Scalar(ScalarType::Float))),
            )
            .with_doc("Lookup timeout in seconds"),
        ]
    }

    fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
        Ok(Self {
            id: ns.require("id")?,
            timeout: ns.take_opt_float("timeout")?,
        })
    }
}

fn main() {
    let parser = build_parser::<Lookup>().expect("schema assembles");

    let samples: &[&[&str]] = &[
        &["--id", "5"],
        &["--id", "abc"],
        // Trial order is the contract: int accepts this before str can.
        &["--id", "007"],
        &["--id", "abc", "--timeout", "2.5"],
        &["--id", "abc", "--timeout", "soon"],
    ];

    for tokens in samples {
        print!("{tokens:?} => ");
        match parser.parse(tokens.iter().copied()) {
            Ok(lookup) => println!("{lookup:?}"),
            Err(err) => println!("error: {err}"),
        }
    }
}
