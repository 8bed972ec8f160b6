use super::*;
use crate::{Access, TypeKind, TypeQualifiers, TypeSpecifiers};
use pretty_assertions::assert_eq;

fn proto(params: &[(&str, &str)], ret: &str) -> Prototype {
    let params = params
        .iter()
        .map(|(ty, name)| Parameter::new(*name, *ty, false))
        .collect();
    Prototype::new(params, ret, false)
}

#[test]
fn free_function_signatures() {
    let f = Function::new("ns::add", "ns", proto(&[("int", "a"), ("int", "b")], "int"));
    assert_eq!(f.signature(), "ns::add(int a, int b) -> int");
    assert_eq!(f.name(), "add");

    let nullary = Function::new("tick", "", proto(&[], "void"));
    assert_eq!(nullary.signature(), "tick(void) -> void");

    let variadic = Function {
        proto: Prototype::new(vec![Parameter::new("fmt", "const char*", false)], "int", true),
        ..Function::new("printf", "", proto(&[], "int"))
    }
    .with_specifiers(TypeSpecifiers::INLINE | TypeSpecifiers::STATIC);
    assert_eq!(
        variadic.signature(),
        "inline static printf(const char* fmt, ...) -> int"
    );
    assert!(variadic.is_variadic());
}

#[test]
fn method_signatures() {
    let getter = Function::new("S::get", "S", proto(&[], "int"))
        .with_specifiers(TypeSpecifiers::METHOD)
        .with_qualifiers(TypeQualifiers::CONST);
    assert_eq!(getter.signature(), "S::get() const -> int");
    assert!(getter.is_const());
    assert!(getter.is_method());

    let ctor = Function::new("S::S", "S", proto(&[("const S&", "")], "void"))
        .with_specifiers(
            TypeSpecifiers::METHOD | TypeSpecifiers::CONSTRUCTOR | TypeSpecifiers::COPY_CTOR,
        );
    assert_eq!(ctor.signature(), "S::S(const S&)");
    assert!(ctor.is_copy_constructor());

    let dtor = Function::new("S::~S", "S", proto(&[], "void"))
        .with_specifiers(
            TypeSpecifiers::METHOD | TypeSpecifiers::DESTRUCTOR | TypeSpecifiers::VIRTUAL,
        );
    assert_eq!(dtor.signature(), "S::~S()");
    assert!(dtor.is_destructor());
    assert!(dtor.is_virtual());
    assert!(!dtor.is_static());
}

#[test]
fn default_parameters_are_counted() {
    let f = Function::new(
        "f",
        "",
        Prototype::new(
            vec![
                Parameter::new("a", "int", false),
                Parameter::new("b", "int", true),
                Parameter::new("c", "double", true),
            ],
            "void",
            false,
        ),
    );
    assert_eq!(f.num_param(), 3);
    assert_eq!(f.num_default_param(), 2);
    assert_eq!(f.param(2).ty.name(), "double");
    assert_eq!(f.return_type().name(), "void");
}

#[test]
#[should_panic(expected = "param index 3 out of range")]
fn param_index_out_of_range_panics() {
    let f = Function::new("f", "", proto(&[("int", "a")], "void"));
    let _ = f.param(3);
}

#[test]
#[should_panic(expected = "member index 0 out of range")]
fn member_index_out_of_range_panics() {
    let r = RecordType::new("Empty", "", 1);
    let _ = r.member(0);
}

#[test]
fn function_type_signature() {
    let ft = FunctionType::new(
        "int()(double, char)",
        proto(&[("double", ""), ("char", "")], "int"),
    );
    assert_eq!(ft.signature(), "int()(double, char)(double, char) -> int");
    let ty = Type::Function(ft);
    assert_eq!(ty.kind(), TypeKind::FunctionProto);
    assert_eq!(ty.scope(), "");
    assert_eq!(ty.variant_name(), "function-type");
}

#[test]
fn derived_type_spellings() {
    assert_eq!(PtrType::new("int", 8).header.qualified, "int*");
    assert_eq!(RefType::new("S", 8).header.qualified, "S&");
    assert_eq!(PtrType::to_member("int", "S", 8).header.qualified, "int S::*");

    let row = ArrayType::new("int", 3, 4);
    assert_eq!(row.header.qualified, "int[3]");
    assert_eq!(row.header.size, 12);
    let grid = ArrayType::new(row.header.qualified.as_str(), 2, row.header.size);
    assert_eq!(grid.header.qualified, "int[2][3]");
    assert_eq!(grid.header.size, 24);
    assert_eq!(ArrayType::new("char", 0, 1).header.qualified, "char[]");
}

#[test]
fn headers_split_name_and_scope() {
    let td = Type::Typedef(TypedefType::new("std::size_t", "std", "unsigned long", 8));
    assert_eq!(td.qualified_name(), "std::size_t");
    assert_eq!(td.name(), "size_t");
    assert_eq!(td.scope(), "std");
    assert_eq!(td.size(&Registry::new()), Ok(8));

    let nested = Type::Class(RecordType::new(
        "std::map<int,int>::iterator",
        "std::map<int,int>",
        8,
    ));
    assert_eq!(nested.name(), "iterator");
    assert!(nested.as_record().is_some());
}

#[test]
fn member_classification() {
    let data = Member::new("x", "int", TypeKind::Int, Access::Protected, 0);
    assert!(data.is_data_member());
    assert!(data.is_protected());

    let method = Member::new("f", "void(S::)()", TypeKind::FunctionProto, Access::Private, 0);
    assert!(method.is_function_member());
    assert!(!method.is_data_member());
    assert!(method.is_private());

    let e = Member::enumerator("Red", 2);
    assert!(e.is_enum_member());
    assert!(e.is_public());
    assert_eq!(e.ty.name(), "int");

    let colored = Member::new("color", "Color", TypeKind::Enum, Access::Public, 4);
    assert!(colored.is_data_member());
    assert!(!colored.is_enum_member());
}

#[test]
fn enum_members_take_the_enclosing_scope() {
    let e = EnumType::new("ns::E", "ns", 4, vec![Member::enumerator("A", 0)]);
    assert_eq!(e.num_member(), 1);
    assert_eq!(e.member(0).qualified_name(), "ns::A");
}

#[test]
fn identifier_accessors() {
    let m = Member {
        scope: "S".into(),
        ..Member::new("x", "int", TypeKind::Int, Access::Public, 0)
    };
    let id = Identifier::Member(m);
    assert_eq!(id.qualified_name(), "S::x");
    assert_eq!(id.name(), "x");
    assert_eq!(id.kind(), IdKind::Variable);
    assert!(id.as_member().is_some());
    assert!(id.as_type().is_none());

    let ns = Identifier::from(Namespace::new("a::b", "a"));
    assert_eq!(ns.name(), "b");
    assert_eq!(ns.scope(), "a");
    assert_eq!(ns.kind(), IdKind::Namespace);
}
