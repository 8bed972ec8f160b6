//! Ingest a GCC-XML dump through the distiller table, persist the registry,
//! reload it and query it by name.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use cxx_gccxml::{register_distiller, GccXmlDistiller, IngestOptions};
use cxx_types::{
    init_tracing, save, Access, DistillError, DistillerTable, IdKind, Identifier, MetaValue,
    Normalizer, Registry, Type, TypeKind, TypeQualifiers, TypeSpecifiers,
};
use pretty_assertions::assert_eq;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shapes.xml")
}

fn table() -> DistillerTable {
    let mut table = DistillerTable::with_builtins();
    register_distiller(&mut table).unwrap();
    table
}

fn ingested() -> Registry {
    let mut reg = Registry::new();
    table()
        .load(
            "gccxml",
            &mut BufReader::new(File::open(fixture()).unwrap()),
            &mut reg,
        )
        .unwrap();
    reg
}

#[test]
fn distiller_is_registered_once() {
    let mut table = table();
    assert_eq!(table.names(), vec!["binary", "gccxml"]);
    assert!(matches!(
        register_distiller(&mut table),
        Err(DistillError::DuplicateDistiller { name }) if name == "gccxml"
    ));
}

#[test]
fn ingest_save_load_query() {
    init_tracing();
    let table = table();

    let mut reg = Registry::new();
    let meta = table
        .load(
            "gccxml",
            &mut BufReader::new(File::open(fixture()).unwrap()),
            &mut reg,
        )
        .unwrap();
    assert_eq!(meta["source"], MetaValue::from("gccxml"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shapes.reg");
    save(&reg, BufWriter::new(File::create(&path).unwrap()), &meta).unwrap();

    let mut loaded = Registry::new();
    let got = table
        .load(
            "binary",
            &mut BufReader::new(File::open(&path).unwrap()),
            &mut loaded,
        )
        .unwrap();
    assert_eq!(got, meta);

    let mut before = reg.all_names();
    let mut after = loaded.all_names();
    before.sort_unstable();
    after.sort_unstable();
    assert_eq!(after, before);

    let circle = loaded.lookup_type("shapes::Circle").unwrap().as_record().unwrap();
    assert!(circle.has_base("shapes::Shape"));
    let radius = &circle.members()[2];
    assert_eq!(radius.name, "radius_");
    assert_eq!(radius.ty.size(&loaded), Ok(8));
    assert_eq!(radius.ty.kind(&loaded), Ok(TypeKind::Typedef));
    assert_eq!(
        loaded
            .decl_scope(loaded.lookup("shapes::Circle::radius_").unwrap())
            .map(Identifier::qualified_name)
            .as_deref(),
        Some("shapes::Circle")
    );
}

#[test]
fn namespaces_and_templates() {
    let reg = ingested();
    for ns in ["std", "shapes"] {
        assert_eq!(reg.lookup(ns).map(Identifier::kind), Some(IdKind::Namespace));
    }
    assert!(reg.lookup_type("std::vector<double>").is_some());
    assert!(reg.lookup_type("std::allocator<double>").is_some());

    let samples = reg.lookup("shapes::samples").and_then(Identifier::as_variable).unwrap();
    assert_eq!(samples.ty.name(), "std::vector<double>");
    assert_eq!(samples.ty.size(&reg), Ok(24));

    let max_of = reg
        .lookup("shapes::max_of<int>")
        .and_then(Identifier::as_overload_set)
        .unwrap();
    assert_eq!(max_of.signatures(), vec!["shapes::max_of<int>(int a, int b) -> int".to_string()]);
}

#[test]
fn keep_all_template_args() {
    let mut table = DistillerTable::new();
    let options = IngestOptions {
        keep_all_template_args: true,
        ..IngestOptions::default()
    };
    table
        .register(
            "gccxml-verbose",
            Box::new(GccXmlDistiller::new(Normalizer::new(), options)),
        )
        .unwrap();
    let mut reg = Registry::new();
    table
        .load(
            "gccxml-verbose",
            &mut BufReader::new(File::open(fixture()).unwrap()),
            &mut reg,
        )
        .unwrap();
    assert!(reg
        .lookup_type("std::vector<double,std::allocator<double> >")
        .is_some());
    assert!(reg.lookup_type("std::vector<double>").is_none());
}

#[test]
fn class_layout() {
    let reg = ingested();

    let shape = reg.lookup_type("shapes::Shape").unwrap();
    assert!(shape.specifiers().contains(TypeSpecifiers::ABSTRACT));
    let shape = shape.as_record().unwrap();
    let members: Vec<(&str, &str)> = shape
        .members()
        .iter()
        .map(|m| (m.name.as_str(), m.ty.name()))
        .collect();
    assert_eq!(
        members,
        vec![
            ("~Shape", "void(shapes::Shape::)(void)"),
            ("area", "shapes::real(shapes::Shape::)(void) const"),
            ("kind_", "shapes::Kind"),
        ]
    );
    let kind = &shape.members()[2];
    assert_eq!((kind.offset, kind.access), (8, Access::Protected));
    assert!(kind.is_data_member());

    let circle = reg.lookup_type("shapes::Circle").unwrap().as_record().unwrap();
    assert_eq!(circle.header.size, 24);
    let names: Vec<&str> = circle.members().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Circle", "area", "radius_", "instances"]);
    assert_eq!(circle.bases().len(), 1);
    assert_eq!(circle.base(0).access, Access::Public);

    let point = reg.lookup_type("shapes::Point").unwrap().as_record().unwrap();
    let offsets: Vec<u64> = point.members().iter().map(|m| m.offset).collect();
    assert_eq!(offsets, vec![0, 8]);
}

#[test]
fn member_functions() {
    let reg = ingested();
    let area = reg
        .lookup("shapes::Shape::area")
        .and_then(Identifier::as_overload_set)
        .unwrap();
    let area = area.function(0);
    assert!(area.is_virtual() && area.is_const() && area.is_method());
    assert_eq!(area.signature(), "shapes::Shape::area() const -> shapes::real");

    let ctor = reg
        .lookup("shapes::Circle::Circle")
        .and_then(Identifier::as_overload_set)
        .unwrap()
        .function(0);
    assert!(ctor.is_constructor() && !ctor.is_copy_constructor());
    assert!(ctor.specifiers().contains(TypeSpecifiers::EXPLICIT));
    assert_eq!(ctor.signature(), "shapes::Circle::Circle(shapes::length r)");

    let dtor = reg
        .lookup("shapes::Shape::~Shape")
        .and_then(Identifier::as_overload_set)
        .unwrap()
        .function(0);
    assert!(dtor.is_destructor());
}

#[test]
fn free_function_overloads() {
    let reg = ingested();
    let scale = reg
        .lookup("shapes::scale")
        .and_then(Identifier::as_overload_set)
        .unwrap();
    assert_eq!(
        scale.signatures(),
        vec![
            "shapes::scale(const shapes::Shape& s, double factor) -> shapes::real".to_string(),
            "shapes::scale(shapes::Point* p, int n) -> shapes::real".to_string(),
        ]
    );
    assert_eq!(scale.function(0).num_default_param(), 1);

    let plus = reg
        .lookup("shapes::operator+")
        .and_then(Identifier::as_overload_set)
        .unwrap()
        .function(0);
    assert!(plus.is_operator());
    assert_eq!(plus.return_type().name(), "shapes::Point");
}

#[test]
fn typedef_chains_resolve() {
    let reg = ingested();
    let Some(Type::Typedef(length)) = reg.lookup_type("shapes::length") else {
        panic!("shapes::length is not a typedef");
    };
    assert_eq!(length.underlying.name(), "shapes::real");
    let Some(Type::Typedef(real)) = length.underlying.resolve(&reg).ok() else {
        panic!("shapes::real is not a typedef");
    };
    assert_eq!(real.underlying.name(), "double");
    assert_eq!(real.underlying.kind(&reg), Ok(TypeKind::Double));

    let Some(Type::Typedef(size_t)) = reg.lookup_type("size_t") else {
        panic!("size_t is not a typedef");
    };
    assert_eq!(size_t.underlying.name(), "unsigned long");
    assert_eq!(size_t.header.size, 8);

    let Some(Type::Typedef(anon)) = reg.lookup_type("shapes::Anon") else {
        panic!("shapes::Anon is not a typedef");
    };
    assert_eq!(anon.underlying.name(), "shapes::@anon@_21");
    assert_eq!(anon.underlying.size(&reg), Ok(4));
}

#[test]
fn derived_type_spellings() {
    let reg = ingested();
    for (name, kind) in [
        ("const shapes::Shape&", TypeKind::LValueRef),
        ("const shapes::Point&", TypeKind::LValueRef),
        ("shapes::Point*", TypeKind::Ptr),
        ("const char*", TypeKind::Ptr),
        ("const char*[2]", TypeKind::ConstantArray),
        ("int()(int)", TypeKind::FunctionProto),
        ("int(*)(int)", TypeKind::Ptr),
    ] {
        let ty = reg.lookup_type(name).unwrap_or_else(|| panic!("missing `{name}`"));
        assert_eq!(ty.kind(), kind, "{name}");
    }

    let const_char = reg.lookup_type("const char").unwrap();
    assert_eq!(const_char.qualifiers(), TypeQualifiers::CONST);
    assert_eq!(const_char.size(&reg), Ok(1));

    let Some(Type::Array(names)) = reg.lookup_type("const char*[2]") else {
        panic!("const char*[2] is not an array");
    };
    assert_eq!((names.len, names.header.size), (2, 16));
    assert_eq!(names.elem.name(), "const char*");

    let callback = reg.lookup("shapes::callback").and_then(Identifier::as_variable).unwrap();
    assert_eq!(callback.ty.name(), "int(*)(int)");
}

#[test]
fn enumerators_leak_into_enclosing_scope() {
    let reg = ingested();
    let kind = reg.lookup_type("shapes::Kind").unwrap();
    assert_eq!(kind.kind(), TypeKind::Enum);
    let square = reg.lookup("shapes::Square").and_then(Identifier::as_member).unwrap();
    assert_eq!(square.value, Some(4));
    assert_eq!(square.scope, "shapes");
}

#[test]
fn static_members_stay_with_their_class() {
    let reg = ingested();
    assert!(reg.lookup("shapes::Circle::instances").is_some());
    assert!(reg
        .iter()
        .all(|(_, id)| id.as_variable().map_or(true, |v| v.scope == "shapes")));
}

#[test]
fn malformed_input_leaves_registry_untouched() {
    let mut reg = ingested();
    let before = reg.count();
    let err = table()
        .load("gccxml", &mut "<GCC_XML><Class".as_bytes(), &mut reg)
        .unwrap_err();
    assert!(matches!(err, DistillError::Ingest(_)), "{err}");
    assert_eq!(reg.count(), before);
}
