//! Exclusive-group example.
//!
//! Two boolean fields share one conflict tag, so they land in the same
//! mutually-exclusive group; supplying both flags in one token list is
//! rejected by the engine at match time.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argdecl-demos --example exclusive
//! ```

use argdecl_core::{
    ConstructionError, FieldDeclaration, Metadata, Namespace, ScalarType, Schema, TypeRef,
};
use argdecl_engine::build_parser;

#[derive(Debug)]
struct Volume {
    verbose: bool,
    quiet: bool,
}

impl Schema for Volume {
    fn name() -> &'static str {
        "volume"
    }

    fn fields() -> Vec<FieldDeclaration> {
        vec![
            FieldDeclaration::new("verbose", TypeRef::Scalar(ScalarType::Bool))
                .with_metadata(Metadata::new().with_conflicts("volume"))
                .with_doc("Say more"),
            FieldDeclaration::new("quiet", TypeRef::Scalar(ScalarType::Bool))
                .with_metadata(Metadata::new().with_conflicts("volume"))
                .with_doc("Say nothing"),
        ]
    }

    fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
        Ok(Self {
            verbose: ns.take_bool("verbose")?,
            quiet: ns.take_bool("quiet")?,
        })
    }
}

fn main() {
    let parser = build_parser::<Volume>().expect("schema assembles");

    for tokens in [&["--verbose"][..], &["--quiet"][..], &["--verbose", "--quiet"][..]] {
        print!("{tokens:?} => ");
        match parser.parse(tokens.iter().copied()) {
            Ok(volume) => println!("{volume:?}"),
            Err(err) => println!("error: {err}"),
        }
    }
}
