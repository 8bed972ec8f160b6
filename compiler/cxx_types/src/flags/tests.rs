use pretty_assertions::assert_eq;

use super::*;

#[test]
fn qualifier_display() {
    assert_eq!(TypeQualifiers::empty().to_string(), "<none>");
    assert_eq!(TypeQualifiers::CONST.to_string(), "const");
    assert_eq!(
        (TypeQualifiers::VOLATILE | TypeQualifiers::CONST | TypeQualifiers::RESTRICT).to_string(),
        "const|restrict|volatile"
    );
}

#[test]
fn specifier_groups_do_not_overlap() {
    let storage = TypeSpecifiers::REGISTER
        | TypeSpecifiers::VIRTUAL
        | TypeSpecifiers::STATIC
        | TypeSpecifiers::INLINE
        | TypeSpecifiers::EXTERN;
    let roles = TypeSpecifiers::CONSTRUCTOR
        | TypeSpecifiers::DESTRUCTOR
        | TypeSpecifiers::COPY_CTOR
        | TypeSpecifiers::OPERATOR
        | TypeSpecifiers::CONVERTER
        | TypeSpecifiers::METHOD
        | TypeSpecifiers::EXPLICIT;
    assert!(!storage.intersects(roles));
    assert_eq!(storage.bits() & 0xFFFF_FF00, 0);
    assert_eq!(roles.bits() & !0xFF00, 0);
}

#[test]
fn access_parsing() {
    assert_eq!(Access::parse(""), Some(Access::Public));
    assert_eq!(Access::parse("public"), Some(Access::Public));
    assert_eq!(Access::parse("protected"), Some(Access::Protected));
    assert_eq!(Access::parse("private"), Some(Access::Private));
    assert_eq!(Access::parse("friend"), None);
    assert_eq!(Access::default(), Access::Public);
    assert_eq!(Access::Protected.to_string(), "protected");
}
