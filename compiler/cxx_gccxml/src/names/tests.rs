use pretty_assertions::assert_eq;

use super::*;
use crate::{Argument, Document};

fn rec(tag: &str, id: &str, attrs: &[(&str, &str)]) -> Record {
    attrs
        .iter()
        .fold(Record::new(tag, id), |r, (k, v)| r.with_attr(k, v))
}

fn arg(ty: &str) -> Argument {
    Argument {
        name: String::new(),
        ty: ty.into(),
        default: None,
    }
}

/// A small translation unit:
///
/// ```text
/// namespace NS { class A { int f(int) const; }; }
/// namespace { struct Hidden; }
/// typedef std::vector<int> IntVec;
/// ```
fn doc() -> Document {
    let mut method_ty = rec(
        "MethodType",
        "_mt",
        &[("basetype", "_a"), ("returns", "_int"), ("const", "1")],
    );
    method_ty.arguments.push(arg("_int"));
    let mut fn_ty = rec("FunctionType", "_ft", &[("returns", "_void")]);
    fn_ty.arguments.push(arg("_int"));
    fn_ty.arguments.push(arg("_pchar"));
    let mut variadic = rec("FunctionType", "_fv", &[("returns", "_int")]);
    variadic.ellipsis = true;

    Document::from_records(vec![
        rec("Namespace", "_g", &[("name", "::")]),
        rec("Namespace", "_ns", &[("name", "NS"), ("context", "_g")]),
        rec("Namespace", "_std", &[("name", "std"), ("context", "_g")]),
        rec("Namespace", "_anon", &[("name", ""), ("context", "_g")]),
        rec("Class", "_a", &[("name", "A"), ("context", "_ns")]),
        rec("Struct", "_hidden", &[("name", "Hidden"), ("context", "_anon")]),
        rec(
            "Class",
            "_vec",
            &[
                ("name", "vector<int,std::allocator<int> >"),
                ("context", "_std"),
            ],
        ),
        rec("Union", "_u", &[("name", ""), ("context", "_a")]),
        rec("Field", "_ux", &[("name", "x"), ("context", "_u"), ("type", "_int")]),
        rec("Struct", "_dot", &[("name", "._12"), ("context", "_g")]),
        rec("FundamentalType", "_int", &[("name", "int")]),
        rec("FundamentalType", "_void", &[("name", "void")]),
        rec("FundamentalType", "_ulong", &[("name", "long unsigned int")]),
        rec("FundamentalType", "_char", &[("name", "char")]),
        rec("PointerType", "_pchar", &[("type", "_char")]),
        rec("PointerType", "_ppchar", &[("type", "_pchar")]),
        rec("ReferenceType", "_ra", &[("type", "_a")]),
        rec("CvQualifiedType", "_ac", &[("type", "_a"), ("const", "1")]),
        rec("ReferenceType", "_rac", &[("type", "_ac")]),
        rec("CvQualifiedType", "_pcharc", &[("type", "_pchar"), ("const", "1")]),
        rec(
            "CvQualifiedType",
            "_intcv",
            &[("type", "_int"), ("const", "1"), ("volatile", "1")],
        ),
        rec("PointerType", "_pderived", &[("type", "_intc")]),
        rec("ArrayType", "_arr3", &[("type", "_int"), ("max", "2")]),
        rec("ArrayType", "_arr23", &[("type", "_arr3"), ("max", "1")]),
        rec("ArrayType", "_open", &[("type", "_int"), ("max", "")]),
        rec("ArrayType", "_neg", &[("type", "_int"), ("max", "-1")]),
        rec("PointerType", "_parr", &[("type", "_arr3")]),
        fn_ty,
        variadic,
        rec("PointerType", "_pft", &[("type", "_ft")]),
        rec("PointerType", "_ppft", &[("type", "_pft")]),
        rec("CvQualifiedType", "_pftc", &[("type", "_pft"), ("const", "1")]),
        rec("ArrayType", "_apft", &[("type", "_pft"), ("max", "3")]),
        method_ty,
        rec("PointerType", "_pmt", &[("type", "_mt")]),
        rec("OffsetType", "_off", &[("type", "_int"), ("basetype", "_a")]),
        rec("Typedef", "_td", &[("name", "IntVec"), ("context", "_ns"), ("type", "_vec")]),
        rec("Method", "_f", &[("name", "f"), ("context", "_a")]),
        rec("Destructor", "_dtor", &[("name", "A"), ("context", "_a")]),
        rec(
            "Unimplemented",
            "_unimpl",
            &[("tree_code_name", "template_type_parm"), ("context", "_ns")],
        ),
        rec("PointerType", "_dangling", &[("type", "_missing")]),
        rec("PointerType", "_loop1", &[("type", "_loop2")]),
        rec("PointerType", "_loop2", &[("type", "_loop1")]),
    ])
}

fn names(ids: &[&str]) -> Vec<String> {
    let doc = doc();
    let index = IdIndex::build(&doc);
    let normalizer = Normalizer::new();
    let mut namer = Namer::new(&index, &normalizer, false);
    ids.iter().map(|id| namer.type_name(id).unwrap()).collect()
}

fn name(id: &str) -> String {
    names(&[id]).remove(0)
}

#[test]
fn namespaces() {
    assert_eq!(names(&["_g", "_ns", "_anon"]), vec!["", "NS", "@anonymous@namespace@"]);
    assert_eq!(name("_hidden"), "@anonymous@namespace@::Hidden");
}

#[test]
fn records_are_scoped_and_normalized() {
    assert_eq!(name("_a"), "NS::A");
    assert_eq!(name("_vec"), "std::vector<int>");
    assert_eq!(name("_td"), "NS::IntVec");
}

#[test]
fn unnamed_records() {
    assert_eq!(name("_u"), "NS::A::@anon@_u");
    assert_eq!(name("_dot"), "@anon@_dot");
    // members of an anonymous union belong to the enclosing class
    assert_eq!(name("_ux"), "NS::A::x");
}

#[test]
fn builtins_normalized() {
    assert_eq!(names(&["_int", "_ulong"]), vec!["int", "unsigned long"]);
}

#[test]
fn pointers_and_references() {
    assert_eq!(
        names(&["_pchar", "_ppchar", "_ra", "_rac"]),
        vec!["char*", "char**", "NS::A&", "const NS::A&"]
    );
}

#[test]
fn cv_qualification() {
    assert_eq!(
        names(&["_ac", "_pcharc", "_intcv"]),
        vec!["const NS::A", "char* const", "const volatile int"]
    );
}

#[test]
fn undefined_cv_id_derived_from_base() {
    assert_eq!(name("_pderived"), "const int*");
}

#[test]
fn arrays() {
    assert_eq!(
        names(&["_arr3", "_arr23", "_open", "_neg", "_parr"]),
        vec!["int[3]", "int[2][3]", "int[]", "int[]", "int(*)[3]"]
    );
}

#[test]
fn function_types_and_pointers() {
    assert_eq!(
        names(&["_ft", "_fv", "_pft", "_ppft", "_pftc", "_apft"]),
        vec![
            "void()(int, char*)",
            "int()(...)",
            "void(*)(int, char*)",
            "void(**)(int, char*)",
            "void(* const)(int, char*)",
            "void(*[4])(int, char*)",
        ]
    );
}

#[test]
fn method_and_member_pointer_types() {
    assert_eq!(
        names(&["_mt", "_pmt", "_off"]),
        vec!["int(NS::A::)(int) const", "int(NS::A::*)(int) const", "int NS::A::*"]
    );
}

#[test]
fn declarations() {
    assert_eq!(
        names(&["_f", "_dtor", "_unimpl"]),
        vec!["NS::A::f", "NS::A::~A", "NS::template_type_parm"]
    );
}

#[test]
fn keep_all_template_args() {
    let doc = doc();
    let index = IdIndex::build(&doc);
    let normalizer = Normalizer::new();
    let mut namer = Namer::new(&index, &normalizer, true);
    assert_eq!(
        namer.type_name("_vec").unwrap(),
        "std::vector<int,std::allocator<int> >"
    );
}

#[test]
fn unknown_ids_name_their_referrer() {
    let doc = doc();
    let index = IdIndex::build(&doc);
    let normalizer = Normalizer::new();
    let mut namer = Namer::new(&index, &normalizer, false);
    match namer.type_name("_dangling").unwrap_err() {
        IngestError::UnknownId { id, referenced_by } => {
            assert_eq!(id, "_missing");
            assert_eq!(referenced_by, "_dangling");
        }
        other => panic!("unexpected error: {other}"),
    }
    match namer.referenced_name("_missing", "_typedef").unwrap_err() {
        IngestError::UnknownId { referenced_by, .. } => assert_eq!(referenced_by, "_typedef"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(namer.referenced_name("_pchar", "_typedef").unwrap(), "char*");
    assert!(matches!(
        namer.scope_name("_nowhere"),
        Err(IngestError::UnknownId { .. })
    ));
}

#[test]
fn cycles_are_errors() {
    let doc = doc();
    let index = IdIndex::build(&doc);
    let normalizer = Normalizer::new();
    let mut namer = Namer::new(&index, &normalizer, false);
    assert!(matches!(
        namer.type_name("_loop1"),
        Err(IngestError::CyclicReference { id }) if id == "_loop1"
    ));
    // a failed spelling leaves the namer usable
    assert_eq!(namer.type_name("_pchar").unwrap(), "char*");
}

#[test]
fn scope_names() {
    let doc = doc();
    let index = IdIndex::build(&doc);
    let normalizer = Normalizer::new();
    let mut namer = Namer::new(&index, &normalizer, false);
    assert_eq!(namer.scope_name("_f").unwrap(), "NS::A");
    assert_eq!(namer.scope_name("_a").unwrap(), "NS");
    assert_eq!(namer.scope_name("_ns").unwrap(), "");
    assert_eq!(namer.scope_name("_int").unwrap(), "");
}

#[test]
fn declarator_placement() {
    assert_eq!(add_declarator("int", "*"), "int*");
    assert_eq!(add_declarator("std::map<int,int>", "&"), "std::map<int,int>&");
    assert_eq!(add_declarator("int(*)[3]", "[2]"), "int(*[2])[3]");
    assert_eq!(
        add_declarator("std::function<void(int)>", "*"),
        "std::function<void(int)>*"
    );
    assert_eq!(add_declarator("void()(void)", "&"), "void(&)(void)");
}

#[test]
fn cv_words_order() {
    assert_eq!(cv_spelling("int", TypeQualifiers::all()), "const volatile restrict int");
    assert_eq!(cv_spelling("int", TypeQualifiers::empty()), "int");
    assert_eq!(cv_spelling("A&", TypeQualifiers::CONST), "A& const");
}
