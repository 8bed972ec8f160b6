//! End-to-end use of the public API: build a registry by hand, persist it,
//! load it into a fresh registry and query it by name.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::fs::File;
use std::io::{BufReader, BufWriter};

use cxx_types::{
    init_tracing, save, Access, CvQualType, DistillerTable, EnumType, Function, FundamentalType,
    Identifier, MetaData, MetaValue, Member, Namespace, Normalizer, Parameter, Prototype, PtrType,
    RecordType, Registry, Type, TypeKind, TypeQualifiers, TypeSpecifiers,
};
use pretty_assertions::assert_eq;

fn build() -> Registry {
    let normalizer = Normalizer::new();
    let mut reg = Registry::new();
    for (name, size, kind) in [
        ("int", 4, TypeKind::Int),
        ("unsigned long", 8, TypeKind::ULong),
        ("double", 8, TypeKind::Double),
    ] {
        reg.register(Type::Fundamental(FundamentalType::new(name, size, kind)))
            .unwrap();
    }
    reg.register(Namespace::new("shapes", "")).unwrap();

    let vec_name = normalizer.normalize_class("std::vector<double,std::allocator<double> >", false);
    reg.register(Type::Class(RecordType::new(vec_name.as_str(), "std", 24)))
        .unwrap();

    reg.register(Type::Class(RecordType::new("shapes::Shape", "shapes", 16)))
        .unwrap();
    reg.register(Type::Class(RecordType::new("shapes::Circle", "shapes", 24)))
        .unwrap();
    reg.set_members(
        "shapes::Circle",
        vec![Member::new("radius", "double", TypeKind::Double, Access::Private, 16)],
    )
    .unwrap();
    reg.set_bases(
        "shapes::Circle",
        vec![cxx_types::Base::new("shapes::Shape", Access::Public, 0, false)],
    )
    .unwrap();

    reg.register(Type::CvQualified(CvQualType::new(
        "const shapes::Shape",
        "shapes::Shape",
        TypeQualifiers::CONST,
        16,
        TypeKind::Record,
    )))
    .unwrap();
    reg.register(Type::Ptr(PtrType::new("const shapes::Shape", 8)))
        .unwrap();

    reg.register_enum(EnumType::new(
        "shapes::Kind",
        "shapes",
        4,
        vec![Member::enumerator("Round", 0), Member::enumerator("Square", 1)],
    ))
    .unwrap();

    for params in [vec![], vec![Parameter::new("scale", "double", true)]] {
        let area = Function::new(
            "shapes::Shape::area",
            "shapes::Shape",
            Prototype::new(params, "double", false),
        )
        .with_specifiers(TypeSpecifiers::METHOD | TypeSpecifiers::VIRTUAL)
        .with_qualifiers(TypeQualifiers::CONST);
        reg.register(area).unwrap();
    }
    reg
}

#[test]
fn build_save_load_query() {
    init_tracing();
    let reg = build();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shapes.reg");
    let mut meta = MetaData::new();
    meta.insert("source".into(), MetaValue::from("hand-built"));
    save(&reg, BufWriter::new(File::create(&path).unwrap()), &meta).unwrap();

    let mut loaded = Registry::new();
    let table = DistillerTable::with_builtins();
    let got = table
        .load(
            "binary",
            &mut BufReader::new(File::open(&path).unwrap()),
            &mut loaded,
        )
        .unwrap();
    assert_eq!(got, meta);
    assert_eq!(loaded.all_names(), reg.all_names());

    assert!(loaded.lookup_type("std::vector<double>").is_some());
    assert_eq!(
        loaded.lookup("shapes::Round").map(Identifier::kind),
        Some(cxx_types::IdKind::Variable)
    );

    let circle = loaded.lookup_type("shapes::Circle").unwrap();
    let record = circle.as_record().unwrap();
    assert!(record.has_base("shapes::Shape"));
    assert_eq!(record.member(0).ty.size(&loaded), Ok(8));
    assert_eq!(
        loaded
            .decl_scope(loaded.lookup("shapes::Circle::radius").unwrap())
            .map(Identifier::qualified_name)
            .as_deref(),
        Some("shapes::Circle")
    );

    let Some(Type::Ptr(ptr)) = loaded.lookup_type("const shapes::Shape*") else {
        panic!("pointer missing")
    };
    assert_eq!(ptr.pointee.qualifiers(&loaded), Ok(TypeQualifiers::CONST));
    assert_eq!(ptr.pointee.size(&loaded), Ok(16));

    let area = loaded
        .lookup("shapes::Shape::area")
        .and_then(Identifier::as_overload_set)
        .unwrap();
    assert_eq!(
        area.signatures(),
        vec![
            "shapes::Shape::area() const -> double".to_string(),
            "shapes::Shape::area(double scale) const -> double".to_string(),
        ]
    );
    assert_eq!(area.function(1).num_default_param(), 1);
}
