//! Builtin types and the types derived from another type by name.

use serde::{Deserialize, Serialize};

use super::TypeHeader;
use crate::{TypeKind, TypeQualifiers, TypeRef};

/// A builtin type such as `int` or `unsigned long`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundamentalType {
    pub header: TypeHeader,
}

impl FundamentalType {
    /// Builtins live in the global scope.
    pub fn new(name: impl Into<String>, size: u64, kind: TypeKind) -> Self {
        FundamentalType {
            header: TypeHeader::new(name, "", kind).with_size(size),
        }
    }
}

/// A const/volatile/restrict-qualified type.
///
/// The header carries the decorated type's size and kind, plus only the
/// qualifiers this level adds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvQualType {
    pub header: TypeHeader,
    pub underlying: TypeRef,
}

impl CvQualType {
    pub fn new(
        name: impl Into<String>,
        underlying: impl Into<TypeRef>,
        qualifiers: TypeQualifiers,
        size: u64,
        kind: TypeKind,
    ) -> Self {
        CvQualType {
            header: TypeHeader::new(name, "", kind)
                .with_size(size)
                .with_qualifiers(qualifiers),
            underlying: underlying.into(),
        }
    }
}

/// A pointer, or a pointer to member when `member_of` names the class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtrType {
    pub header: TypeHeader,
    pub pointee: TypeRef,
    pub member_of: Option<String>,
}

impl PtrType {
    /// `T*`, spelled from the pointee's name.
    pub fn new(pointee: impl Into<TypeRef>, size: u64) -> Self {
        let pointee = pointee.into();
        let name = format!("{}*", pointee.name());
        Self::named(name, pointee, size)
    }

    /// A pointer whose spelling is not simply `T*` (function and array
    /// pointers).
    pub fn named(name: impl Into<String>, pointee: impl Into<TypeRef>, size: u64) -> Self {
        PtrType {
            header: TypeHeader::new(name, "", TypeKind::Ptr).with_size(size),
            pointee: pointee.into(),
            member_of: None,
        }
    }

    /// `T C::*`.
    pub fn to_member(pointee: impl Into<TypeRef>, class: impl Into<String>, size: u64) -> Self {
        let pointee = pointee.into();
        let class = class.into();
        let name = format!("{} {}::*", pointee.name(), class);
        PtrType {
            header: TypeHeader::new(name, "", TypeKind::Ptr).with_size(size),
            pointee,
            member_of: Some(class),
        }
    }
}

/// An lvalue or rvalue reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefType {
    pub header: TypeHeader,
    pub referent: TypeRef,
}

impl RefType {
    /// `T&`, spelled from the referent's name.
    pub fn new(referent: impl Into<TypeRef>, size: u64) -> Self {
        let referent = referent.into();
        let name = format!("{}&", referent.name());
        Self::named(name, referent, size)
    }

    pub fn named(name: impl Into<String>, referent: impl Into<TypeRef>, size: u64) -> Self {
        RefType {
            header: TypeHeader::new(name, "", TypeKind::LValueRef).with_size(size),
            referent: referent.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefType {
    pub header: TypeHeader,
    pub underlying: TypeRef,
}

impl TypedefType {
    pub fn new(
        name: impl Into<String>,
        scope: impl Into<String>,
        underlying: impl Into<TypeRef>,
        size: u64,
    ) -> Self {
        TypedefType {
            header: TypeHeader::new(name, scope, TypeKind::Typedef).with_size(size),
            underlying: underlying.into(),
        }
    }
}

/// A fixed-length array. `len` is zero for arrays of unknown bound.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayType {
    pub header: TypeHeader,
    pub elem: TypeRef,
    pub len: u64,
}

impl ArrayType {
    /// `T[len]`, sized from the element size.
    pub fn new(elem: impl Into<TypeRef>, len: u64, elem_size: u64) -> Self {
        let elem = elem.into();
        let dim = if len == 0 {
            "[]".to_string()
        } else {
            format!("[{len}]")
        };
        // T[2] of T[3] is spelled T[2][3]
        let name = match elem.name().find('[') {
            Some(pos) => format!("{}{}{}", &elem.name()[..pos], dim, &elem.name()[pos..]),
            None => format!("{}{}", elem.name(), dim),
        };
        Self::named(name, elem, len, elem_size.saturating_mul(len))
    }

    pub fn named(name: impl Into<String>, elem: impl Into<TypeRef>, len: u64, size: u64) -> Self {
        ArrayType {
            header: TypeHeader::new(name, "", TypeKind::ConstantArray).with_size(size),
            elem: elem.into(),
            len,
        }
    }
}
