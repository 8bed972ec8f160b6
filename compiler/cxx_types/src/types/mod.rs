//! The identifier and type taxonomy.
//!
//! [`Identifier`] is the closed set of things a registry holds. Types are one
//! of its variants and are themselves a closed set ([`Type`]). Every variant
//! stores cross-references as qualified names ([`TypeRef`] for types, plain
//! strings for scopes) so values can be stored, cloned and serialized without
//! an object graph.

mod derived;
mod function;
mod record;

pub use derived::{ArrayType, CvQualType, FundamentalType, PtrType, RefType, TypedefType};
pub use function::{Function, FunctionType, OverloadFunctionSet, Parameter, Prototype};
pub use record::{Base, EnumType, Member, RecordType, UnionType};

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{
    qualname, IdKind, Registry, RegistryError, TypeKind, TypeQualifiers, TypeRef, TypeSpecifiers,
};

/// Fields shared by every type variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeHeader {
    /// Fully qualified name; the registry key.
    pub qualified: String,
    /// Qualified name of the declaring scope; `""` is the global namespace.
    pub scope: String,
    /// Size in bytes.
    pub size: u64,
    pub kind: TypeKind,
    pub qualifiers: TypeQualifiers,
    pub specifiers: TypeSpecifiers,
}

impl TypeHeader {
    pub fn new(qualified: impl Into<String>, scope: impl Into<String>, kind: TypeKind) -> Self {
        TypeHeader {
            qualified: qualified.into(),
            scope: scope.into(),
            size: 0,
            kind,
            qualifiers: TypeQualifiers::empty(),
            specifiers: TypeSpecifiers::empty(),
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_qualifiers(mut self, qualifiers: TypeQualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    #[must_use]
    pub fn with_specifiers(mut self, specifiers: TypeSpecifiers) -> Self {
        self.specifiers = specifiers;
        self
    }

    pub fn name(&self) -> &str {
        qualname::strip_scope(&self.qualified, &self.scope)
    }
}

/// A C/C++ type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Fundamental(FundamentalType),
    CvQualified(CvQualType),
    Ptr(PtrType),
    Ref(RefType),
    Typedef(TypedefType),
    Array(ArrayType),
    Struct(RecordType),
    Class(RecordType),
    Enum(EnumType),
    Union(UnionType),
    Function(FunctionType),
}

impl Type {
    pub fn header(&self) -> &TypeHeader {
        match self {
            Type::Fundamental(t) => &t.header,
            Type::CvQualified(t) => &t.header,
            Type::Ptr(t) => &t.header,
            Type::Ref(t) => &t.header,
            Type::Typedef(t) => &t.header,
            Type::Array(t) => &t.header,
            Type::Struct(t) | Type::Class(t) => &t.header,
            Type::Enum(t) => &t.header,
            Type::Union(t) => &t.header,
            Type::Function(t) => &t.header,
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.header().qualified
    }

    pub fn name(&self) -> &str {
        self.header().name()
    }

    pub fn scope(&self) -> &str {
        &self.header().scope
    }

    pub fn kind(&self) -> TypeKind {
        self.header().kind
    }

    pub fn qualifiers(&self) -> TypeQualifiers {
        self.header().qualifiers
    }

    pub fn specifiers(&self) -> TypeSpecifiers {
        self.header().specifiers
    }

    /// Size in bytes. A union without a recorded size computes it from its
    /// members on first query.
    pub fn size(&self, registry: &Registry) -> Result<u64, RegistryError> {
        match self {
            Type::Union(u) => u.size(registry),
            other => Ok(other.header().size),
        }
    }

    /// The record payload of a struct or class.
    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            Type::Struct(r) | Type::Class(r) => Some(r),
            _ => None,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Type::Fundamental(_) => "fundamental",
            Type::CvQualified(_) => "cv-qualified",
            Type::Ptr(_) => "pointer",
            Type::Ref(_) => "reference",
            Type::Typedef(_) => "typedef",
            Type::Array(_) => "array",
            Type::Struct(_) => "struct",
            Type::Class(_) => "class",
            Type::Enum(_) => "enum",
            Type::Union(_) => "union",
            Type::Function(_) => "function-type",
        }
    }
}

/// A namespace, or a namespace alias when `alias_of` is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub qualified: String,
    pub scope: String,
    pub alias_of: Option<String>,
}

impl Namespace {
    pub fn new(qualified: impl Into<String>, scope: impl Into<String>) -> Self {
        Namespace {
            qualified: qualified.into(),
            scope: scope.into(),
            alias_of: None,
        }
    }
}

/// A variable declared at namespace scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub qualified: String,
    pub scope: String,
    pub ty: TypeRef,
    pub specifiers: TypeSpecifiers,
}

/// Anything the registry can hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identifier {
    Namespace(Namespace),
    Function(Function),
    OverloadSet(OverloadFunctionSet),
    Variable(Variable),
    Member(Member),
    Type(Type),
}

impl Identifier {
    /// Fully qualified name; the registry key.
    pub fn qualified_name(&self) -> Cow<'_, str> {
        match self {
            Identifier::Namespace(n) => Cow::Borrowed(&n.qualified),
            Identifier::Function(f) => Cow::Borrowed(&f.qualified),
            Identifier::OverloadSet(o) => Cow::Borrowed(&o.qualified),
            Identifier::Variable(v) => Cow::Borrowed(&v.qualified),
            Identifier::Member(m) => Cow::Owned(m.qualified_name()),
            Identifier::Type(t) => Cow::Borrowed(t.qualified_name()),
        }
    }

    /// Last component of the qualified name.
    pub fn name(&self) -> &str {
        match self {
            Identifier::Namespace(n) => qualname::strip_scope(&n.qualified, &n.scope),
            Identifier::Function(f) => f.name(),
            Identifier::OverloadSet(o) => qualname::strip_scope(&o.qualified, &o.scope),
            Identifier::Variable(v) => qualname::strip_scope(&v.qualified, &v.scope),
            Identifier::Member(m) => &m.name,
            Identifier::Type(t) => t.name(),
        }
    }

    /// Qualified name of the declaring scope; `""` is the global namespace.
    pub fn scope(&self) -> &str {
        match self {
            Identifier::Namespace(n) => &n.scope,
            Identifier::Function(f) => &f.scope,
            Identifier::OverloadSet(o) => &o.scope,
            Identifier::Variable(v) => &v.scope,
            Identifier::Member(m) => &m.scope,
            Identifier::Type(t) => t.scope(),
        }
    }

    pub fn kind(&self) -> IdKind {
        match self {
            Identifier::Namespace(_) => IdKind::Namespace,
            Identifier::Function(_) | Identifier::OverloadSet(_) => IdKind::Function,
            Identifier::Variable(_) | Identifier::Member(_) => IdKind::Variable,
            Identifier::Type(_) => IdKind::Type,
        }
    }

    pub fn as_type(&self) -> Option<&Type> {
        match self {
            Identifier::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_overload_set(&self) -> Option<&OverloadFunctionSet> {
        match self {
            Identifier::OverloadSet(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Identifier::Namespace(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_member(&self) -> Option<&Member> {
        match self {
            Identifier::Member(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Identifier::Variable(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Type> for Identifier {
    fn from(ty: Type) -> Self {
        Identifier::Type(ty)
    }
}

impl From<Function> for Identifier {
    fn from(f: Function) -> Self {
        Identifier::Function(f)
    }
}

impl From<Namespace> for Identifier {
    fn from(ns: Namespace) -> Self {
        Identifier::Namespace(ns)
    }
}

impl From<Variable> for Identifier {
    fn from(v: Variable) -> Self {
        Identifier::Variable(v)
    }
}

#[cfg(test)]
mod tests;
