//! Basic schema example.
//!
//! Declares a small schema — one positional, one defaulted flag, one
//! boolean — assembles it against the reference engine, and parses a
//! token list into a typed value.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argdecl-demos --example basic -- widget --count 5 --verbose
//!
//! # Without arguments, a sample token list is parsed instead.
//! cargo run -p argdecl-demos --example basic
//! ```

use argdecl_core::{
    ConstructionError, FieldDeclaration, Metadata, Namespace, ScalarType, Schema, TypeRef, Value,
};
use argdecl_engine::build_parser;

#[derive(Debug)]
struct Order {
    name: String,
    count: i64,
    verbose: bool,
}

impl Schema for Order {
    fn name() -> &'static str {
        "order"
    }

    fn description() -> &'static str {
        "Order some widgets"
    }

    fn fields() -> Vec<FieldDeclaration> {
        vec![
            FieldDeclaration::new("name", TypeRef::Scalar(ScalarType::Str))
                .with_metadata(Metadata::flags(["name"]))
                .with_doc("Item to order"),
            FieldDeclaration::new("count", TypeRef::Scalar(ScalarType::Int))
                .with_default(Value::Int(1))
                .with_doc("How many to order"),
            FieldDeclaration::new("verbose", TypeRef::Scalar(ScalarType::Bool))
                .with_doc("Narrate the order"),
        ]
    }

    fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
        Ok(Self {
            name: ns.take_string("name")?,
            count: ns.take_int("count")?,
            verbose: ns.take_bool("verbose")?,
        })
    }
}

fn main() {
    let mut tokens: Vec<String> = std::env::args().skip(1).collect();
    if tokens.is_empty() {
        tokens = ["widget", "--count", "5"].map(String::from).to_vec();
        println!("(no arguments given, parsing sample tokens {tokens:?})\n");
    }

    let parser = build_parser::<Order>().expect("schema assembles");

    println!("=== Help ===");
    print!("{}", parser.engine().render_help());

    println!("\n=== Parse ===");
    match parser.parse(tokens) {
        Ok(order) => println!("{order:#?}"),
        Err(err) => println!("parse failed: {err}"),
    }
}
