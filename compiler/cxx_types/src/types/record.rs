//! Records (struct, class, union) and enumerations.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use super::TypeHeader;
use crate::{qualname, Access, Registry, RegistryError, TypeKind, TypeRef};

/// A member of a struct, class, union or enum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub ty: TypeRef,
    /// `Enum` for enumerators, `FunctionProto` for member functions,
    /// otherwise the kind of the member's type.
    pub kind: TypeKind,
    pub access: Access,
    /// Byte offset within the enclosing record.
    pub offset: u64,
    /// Qualified name of the declaring scope.
    pub scope: String,
    /// Enumerator value.
    pub value: Option<i64>,
}

impl Member {
    pub fn new(
        name: impl Into<String>,
        ty: impl Into<TypeRef>,
        kind: TypeKind,
        access: Access,
        offset: u64,
    ) -> Self {
        Member {
            name: name.into(),
            ty: ty.into(),
            kind,
            access,
            offset,
            scope: String::new(),
            value: None,
        }
    }

    /// An enumerator of type `int`.
    pub fn enumerator(name: impl Into<String>, value: i64) -> Self {
        Member {
            value: Some(value),
            ..Member::new(name, "int", TypeKind::Enum, Access::Public, 0)
        }
    }

    pub fn qualified_name(&self) -> String {
        qualname::join(&self.scope, &self.name)
    }

    /// Enumerators carry a value; a data member of enum type does not.
    pub fn is_enum_member(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_function_member(&self) -> bool {
        self.kind.is_function()
    }

    pub fn is_data_member(&self) -> bool {
        !self.is_function_member() && !self.is_enum_member()
    }

    pub fn is_public(&self) -> bool {
        self.access == Access::Public
    }

    pub fn is_protected(&self) -> bool {
        self.access == Access::Protected
    }

    pub fn is_private(&self) -> bool {
        self.access == Access::Private
    }
}

/// A base class specifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base {
    pub ty: TypeRef,
    pub access: Access,
    pub offset: u64,
    pub is_virtual: bool,
}

impl Base {
    pub fn new(ty: impl Into<TypeRef>, access: Access, offset: u64, is_virtual: bool) -> Self {
        Base {
            ty: ty.into(),
            access,
            offset,
            is_virtual,
        }
    }
}

/// Payload shared by struct and class types.
///
/// Built in two phases: register the shell, then attach members and bases
/// through [`Registry::set_members`] and [`Registry::set_bases`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    pub header: TypeHeader,
    pub(crate) members: Vec<Member>,
    pub(crate) bases: Vec<Base>,
}

impl RecordType {
    /// An empty record shell.
    pub fn new(name: impl Into<String>, scope: impl Into<String>, size: u64) -> Self {
        RecordType {
            header: TypeHeader::new(name, scope, TypeKind::Record).with_size(size),
            members: Vec::new(),
            bases: Vec::new(),
        }
    }

    pub fn num_member(&self) -> usize {
        self.members.len()
    }

    /// The `i`th member. Panics if `i` is out of range.
    #[track_caller]
    pub fn member(&self, i: usize) -> &Member {
        self.members
            .get(i)
            .unwrap_or_else(|| {
                panic!("member index {i} out of range for `{}`", self.header.qualified)
            })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn num_base(&self) -> usize {
        self.bases.len()
    }

    /// The `i`th base. Panics if `i` is out of range.
    #[track_caller]
    pub fn base(&self, i: usize) -> &Base {
        self.bases
            .get(i)
            .unwrap_or_else(|| {
                panic!("base index {i} out of range for `{}`", self.header.qualified)
            })
    }

    pub fn bases(&self) -> &[Base] {
        &self.bases
    }

    pub fn has_base(&self, name: &str) -> bool {
        self.bases.iter().any(|b| b.ty.name() == name)
    }

    pub(crate) fn replace_members(&mut self, members: Vec<Member>) {
        self.members = members;
    }

    pub(crate) fn replace_bases(&mut self, bases: Vec<Base>) {
        self.bases = bases;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnionType {
    pub header: TypeHeader,
    pub(crate) members: Vec<Member>,
    #[serde(skip)]
    computed_size: OnceCell<u64>,
}

impl UnionType {
    /// A union whose size is computed from its members when first queried.
    pub fn new(name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::with_size(name, scope, 0)
    }

    /// A union with a known size. Zero means unknown.
    pub fn with_size(name: impl Into<String>, scope: impl Into<String>, size: u64) -> Self {
        UnionType {
            header: TypeHeader::new(name, scope, TypeKind::Record).with_size(size),
            members: Vec::new(),
            computed_size: OnceCell::new(),
        }
    }

    pub fn num_member(&self) -> usize {
        self.members.len()
    }

    /// The `i`th member. Panics if `i` is out of range.
    #[track_caller]
    pub fn member(&self, i: usize) -> &Member {
        self.members
            .get(i)
            .unwrap_or_else(|| {
                panic!("member index {i} out of range for `{}`", self.header.qualified)
            })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub(crate) fn replace_members(&mut self, members: Vec<Member>) {
        self.members = members;
        self.computed_size = OnceCell::new();
    }

    /// The recorded size, or the largest member size, computed once.
    pub fn size(&self, registry: &Registry) -> Result<u64, RegistryError> {
        if self.header.size != 0 {
            return Ok(self.header.size);
        }
        if let Some(size) = self.computed_size.get() {
            return Ok(*size);
        }
        let mut size = 0;
        for m in self.members.iter().filter(|m| m.is_data_member()) {
            size = size.max(m.ty.size(registry)?);
        }
        let _ = self.computed_size.set(size);
        Ok(size)
    }
}

impl PartialEq for UnionType {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && self.members == other.members
    }
}

impl Eq for UnionType {}

/// An unscoped enumeration.
///
/// Enumerators are also registered in the enum's enclosing scope; their
/// `scope` is that enclosing scope, not the enum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub header: TypeHeader,
    pub(crate) members: Vec<Member>,
}

impl EnumType {
    pub fn new(
        name: impl Into<String>,
        scope: impl Into<String>,
        size: u64,
        members: Vec<Member>,
    ) -> Self {
        let header = TypeHeader::new(name, scope, TypeKind::Enum).with_size(size);
        let members = members
            .into_iter()
            .map(|m| Member {
                scope: header.scope.clone(),
                ..m
            })
            .collect();
        EnumType { header, members }
    }

    pub fn num_member(&self) -> usize {
        self.members.len()
    }

    /// The `i`th enumerator. Panics if `i` is out of range.
    #[track_caller]
    pub fn member(&self, i: usize) -> &Member {
        self.members
            .get(i)
            .unwrap_or_else(|| {
                panic!("member index {i} out of range for `{}`", self.header.qualified)
            })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }
}
