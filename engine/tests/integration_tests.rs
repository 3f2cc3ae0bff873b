use argdecl_core::{
    ConstructionError, EngineError, ExclusiveGroups, FieldDeclaration, Metadata, Namespace,
    ParseError, ParserEngine, ScalarType, Schema, SchemaRegistry, TypeRef, Value, assemble,
};
use argdecl_engine::{ArgParser, build_parser};

// ---------------------------------------------------------------------------
// Schemas under test
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Order {
    name: String,
    count: i64,
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
        ]
    }

    fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
        Ok(Self {
            name: ns.take_string("name")?,
            count: ns.take_int("count")?,
        })
    }
}

#[derive(Debug, PartialEq)]
struct Limits {
    limit: Option<i64>,
}

impl Schema for Limits {
    fn name() -> &'static str {
        "limits"
    }

    fn fields() -> Vec<FieldDeclaration> {
        vec![FieldDeclaration::new(
            "limit",
            TypeRef::Optional(Box::new(TypeRef::Scalar(ScalarType::Int))),
        )]
    }

    fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
        Ok(Self {
            limit: ns.take_opt_int("limit")?,
        })
    }
}

#[derive(Debug, PartialEq)]
struct Ident {
    id: Value,
}

impl Schema for Ident {
    fn name() -> &'static str {
        "ident"
    }

    fn fields() -> Vec<FieldDeclaration> {
        vec![
            FieldDeclaration::new("id", TypeRef::Union(vec![ScalarType::Int, ScalarType::Str]))
                .with_doc("Numeric id or symbolic name"),
        ]
    }

    fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
        Ok(Self {
            id: ns.require("id")?,
        })
    }
}

#[derive(Debug, PartialEq)]
struct Verbosity {
    verbose: bool,
}

impl Schema for Verbosity {
    fn name() -> &'static str {
        "verbosity"
    }

    fn fields() -> Vec<FieldDeclaration> {
        vec![FieldDeclaration::new(
            "verbose",
            TypeRef::Scalar(ScalarType::Bool),
        )]
    }

    fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
        Ok(Self {
            verbose: ns.take_bool("verbose")?,
        })
    }
}

#[derive(Debug, PartialEq)]
struct Output {
    json: bool,
    yaml: bool,
}

impl Schema for Output {
    fn name() -> &'static str {
        "output"
    }

    fn fields() -> Vec<FieldDeclaration> {
        vec![
            FieldDeclaration::new("json", TypeRef::Scalar(ScalarType::Bool))
                .with_metadata(Metadata::new().with_conflicts("format")),
            FieldDeclaration::new("yaml", TypeRef::Scalar(ScalarType::Bool))
                .with_metadata(Metadata::new().with_conflicts("format")),
        ]
    }

    fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
        Ok(Self {
            json: ns.take_bool("json")?,
            yaml: ns.take_bool("yaml")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn test_round_trip_with_defaults() {
    let parser = build_parser::<Order>().unwrap();

    let order = parser.parse(["widget"]).unwrap();
    assert_eq!(
        order,
        Order {
            name: "widget".into(),
            count: 1,
        }
    );
}

#[test]
fn test_round_trip_with_explicit_flag() {
    let parser = build_parser::<Order>().unwrap();

    let order = parser.parse(["widget", "--count", "5"]).unwrap();
    assert_eq!(
        order,
        Order {
            name: "widget".into(),
            count: 5,
        }
    );
}

#[test]
fn test_missing_positional_is_rejected() {
    let parser = build_parser::<Order>().unwrap();

    let err = parser.parse(Vec::<String>::new()).unwrap_err();
    assert_eq!(
        err,
        ParseError::Engine(EngineError::MissingRequired("name".into()))
    );
}

// ---------------------------------------------------------------------------
// Optional and union types
// ---------------------------------------------------------------------------

#[test]
fn test_optional_int_is_not_required() {
    let parser = build_parser::<Limits>().unwrap();

    let limits = parser.parse(Vec::<String>::new()).unwrap();
    assert_eq!(limits, Limits { limit: None });

    let limits = parser.parse(["--limit", "42"]).unwrap();
    assert_eq!(limits, Limits { limit: Some(42) });
}

#[test]
fn test_optional_int_rejects_bad_text() {
    let parser = build_parser::<Limits>().unwrap();

    let err = parser.parse(["--limit", "x"]).unwrap_err();
    match err {
        ParseError::Engine(EngineError::InvalidValue { flag, source }) => {
            assert_eq!(flag, "--limit");
            assert_eq!(source.text, "x");
            assert_eq!(source.tried, vec![ScalarType::Int]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_union_tries_members_in_declaration_order() {
    let parser = build_parser::<Ident>().unwrap();

    let ident = parser.parse(["--id", "5"]).unwrap();
    assert_eq!(ident.id, Value::Int(5));

    let ident = parser.parse(["--id", "abc"]).unwrap();
    assert_eq!(ident.id, Value::Str("abc".into()));
}

// ---------------------------------------------------------------------------
// Boolean flags
// ---------------------------------------------------------------------------

#[test]
fn test_boolean_flag_defaults_false_presence_true() {
    let parser = build_parser::<Verbosity>().unwrap();

    let quiet = parser.parse(Vec::<String>::new()).unwrap();
    assert!(!quiet.verbose);

    let loud = parser.parse(["--verbose"]).unwrap();
    assert!(loud.verbose);
}

// ---------------------------------------------------------------------------
// Exclusive groups
// ---------------------------------------------------------------------------

#[test]
fn test_conflicting_flags_are_rejected() {
    let parser = build_parser::<Output>().unwrap();

    let err = parser.parse(["--json", "--yaml"]).unwrap_err();
    assert_eq!(
        err,
        ParseError::Engine(EngineError::Conflict {
            flag: "--yaml".into(),
            other: "--json".into(),
        })
    );
}

#[test]
fn test_single_group_member_parses_cleanly() {
    let parser = build_parser::<Output>().unwrap();

    let output = parser.parse(["--json"]).unwrap();
    assert_eq!(
        output,
        Output {
            json: true,
            yaml: false,
        }
    );
}

#[test]
fn test_shared_tag_creates_one_group() {
    let parser = build_parser::<Output>().unwrap();
    assert_eq!(parser.groups().len(), 1);
}

// ---------------------------------------------------------------------------
// Idempotent assembly
// ---------------------------------------------------------------------------

#[test]
fn test_repeated_assembly_registers_each_destination_once() {
    let mut engine = ArgParser::new("order", "");
    let mut registry = SchemaRegistry::new();
    let mut groups = ExclusiveGroups::new();

    assemble::<Order, _>(&mut engine, &mut registry, &mut groups).unwrap();
    assert_eq!(engine.argument_count(), 2);

    assemble::<Order, _>(&mut engine, &mut registry, &mut groups).unwrap();
    assert_eq!(engine.argument_count(), 2);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_layered_schemas_share_destinations() {
    // A derived schema repeating a base field assembles without
    // duplicate registration.
    struct Derived;

    impl Schema for Derived {
        fn name() -> &'static str {
            "derived"
        }

        fn fields() -> Vec<FieldDeclaration> {
            let mut fields = Order::fields();
            fields.push(FieldDeclaration::new(
                "force",
                TypeRef::Scalar(ScalarType::Bool),
            ));
            fields
        }

        fn from_namespace(_ns: &mut Namespace) -> Result<Self, ConstructionError> {
            Ok(Derived)
        }
    }

    let mut engine = ArgParser::new("derived", "");
    let mut registry = SchemaRegistry::new();
    let mut groups = ExclusiveGroups::new();

    assemble::<Order, _>(&mut engine, &mut registry, &mut groups).unwrap();
    assemble::<Derived, _>(&mut engine, &mut registry, &mut groups).unwrap();

    assert_eq!(engine.argument_count(), 3);
    assert_eq!(
        registry.destinations().collect::<Vec<_>>(),
        vec!["count", "force", "name"]
    );
}

// ---------------------------------------------------------------------------
// Leftover tokens and strict parsing
// ---------------------------------------------------------------------------

#[test]
fn test_parse_known_returns_leftovers() {
    let parser = build_parser::<Order>().unwrap();

    let (order, leftover) = parser
        .parse_known(["widget", "--unknown", "stray"])
        .unwrap();
    assert_eq!(order.name, "widget");
    assert_eq!(leftover, vec!["--unknown".to_string(), "stray".to_string()]);
}

#[test]
fn test_strict_parse_rejects_leftovers() {
    let parser = build_parser::<Order>().unwrap();

    let err = parser.parse(["widget", "--unknown"]).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnrecognizedTokens(vec!["--unknown".into()])
    );
}

// ---------------------------------------------------------------------------
// Construction failures
// ---------------------------------------------------------------------------

#[test]
fn test_missing_constructor_input_surfaces() {
    // Demands a destination that no registered field fills.
    #[derive(Debug)]
    struct Wanting;

    impl Schema for Wanting {
        fn name() -> &'static str {
            "wanting"
        }

        fn fields() -> Vec<FieldDeclaration> {
            vec![FieldDeclaration::new(
                "present",
                TypeRef::Scalar(ScalarType::Bool),
            )]
        }

        fn from_namespace(ns: &mut Namespace) -> Result<Self, ConstructionError> {
            ns.take_int("absent")?;
            Ok(Wanting)
        }
    }

    let parser = build_parser::<Wanting>().unwrap();
    let err = parser.parse(Vec::<String>::new()).unwrap_err();
    assert_eq!(
        err,
        ParseError::Construction(ConstructionError::MissingField("absent".into()))
    );
}

// ---------------------------------------------------------------------------
// Suppressed fields and help output
// ---------------------------------------------------------------------------

#[test]
fn test_suppressed_field_is_not_registered() {
    struct PartlyHidden;

    impl Schema for PartlyHidden {
        fn name() -> &'static str {
            "hidden"
        }

        fn fields() -> Vec<FieldDeclaration> {
            vec![
                FieldDeclaration::new("shown", TypeRef::Scalar(ScalarType::Bool)),
                FieldDeclaration::untyped("internal").with_metadata(Metadata::suppress()),
            ]
        }

        fn from_namespace(_ns: &mut Namespace) -> Result<Self, ConstructionError> {
            Ok(PartlyHidden)
        }
    }

    let parser = build_parser::<PartlyHidden>().unwrap();
    assert_eq!(parser.engine().argument_count(), 1);
    assert!(parser.registry().get("internal").is_none());
}

#[test]
fn test_parsed_namespace_serializes_to_json() {
    let parser = build_parser::<Order>().unwrap();

    let mut ns = Namespace::new();
    parser
        .engine()
        .parse_known(&["widget".to_string()], &mut ns)
        .unwrap();

    let json = serde_json::to_string(&ns).unwrap();
    assert_eq!(json, r#"{"count":1,"name":"widget"}"#);
}

#[test]
fn test_help_lists_registered_arguments() {
    let parser = build_parser::<Order>().unwrap();
    let help = parser.engine().render_help();

    assert!(help.starts_with("Usage: order [OPTIONS] <name>"));
    assert!(help.contains("Order some widgets"));
    assert!(help.contains("--count <COUNT>"));
    assert!(help.contains("How many to order"));
}
