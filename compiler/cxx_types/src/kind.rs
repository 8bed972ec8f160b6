//! Kind tags for identifiers and types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a type.
///
/// Builtin kinds occupy the contiguous range `Void..=ObjCSel`; see
/// [`TypeKind::is_builtin`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TypeKind {
    #[default]
    Invalid,
    Unexposed,

    // === Builtins ===
    Void,
    Bool,
    CharU,
    UChar,
    Char16,
    Char32,
    UShort,
    UInt,
    ULong,
    ULongLong,
    UInt128,
    CharS,
    SChar,
    WChar,
    Short,
    Int,
    Long,
    LongLong,
    Int128,
    Float,
    Double,
    LongDouble,
    NullPtr,
    Overload,
    Dependent,
    ObjCId,
    ObjCClass,
    ObjCSel,

    // === Derived ===
    Complex,
    Ptr,
    BlockPtr,
    LValueRef,
    RValueRef,
    Record,
    Enum,
    Typedef,
    ObjCInterface,
    ObjCObjectPointer,
    FunctionNoProto,
    FunctionProto,
    ConstantArray,
}

impl TypeKind {
    #[inline]
    pub const fn is_builtin(self) -> bool {
        (self as u8) >= (TypeKind::Void as u8) && (self as u8) <= (TypeKind::ObjCSel as u8)
    }

    #[inline]
    pub const fn is_function(self) -> bool {
        matches!(self, TypeKind::FunctionProto | TypeKind::FunctionNoProto)
    }

    /// Kind of a canonical builtin spelling (`"unsigned long"`, `"double complex"`, ...).
    ///
    /// Plain `char` is treated as signed.
    pub fn from_builtin(name: &str) -> Option<Self> {
        let kind = match name {
            "void" => TypeKind::Void,
            "bool" => TypeKind::Bool,
            "char" => TypeKind::CharS,
            "signed char" => TypeKind::SChar,
            "unsigned char" => TypeKind::UChar,
            "wchar_t" => TypeKind::WChar,
            "char16_t" => TypeKind::Char16,
            "char32_t" => TypeKind::Char32,
            "short" => TypeKind::Short,
            "unsigned short" => TypeKind::UShort,
            "int" => TypeKind::Int,
            "unsigned int" => TypeKind::UInt,
            "long" => TypeKind::Long,
            "unsigned long" => TypeKind::ULong,
            "long long" => TypeKind::LongLong,
            "unsigned long long" => TypeKind::ULongLong,
            "__int128" => TypeKind::Int128,
            "unsigned __int128" => TypeKind::UInt128,
            "float" => TypeKind::Float,
            "double" => TypeKind::Double,
            "long double" => TypeKind::LongDouble,
            "float complex" | "double complex" | "long double complex" => TypeKind::Complex,
            _ => return None,
        };
        Some(kind)
    }

    pub const fn name(self) -> &'static str {
        match self {
            TypeKind::Invalid => "Invalid",
            TypeKind::Unexposed => "Unexposed",
            TypeKind::Void => "Void",
            TypeKind::Bool => "Bool",
            TypeKind::CharU => "Char_U",
            TypeKind::UChar => "UChar",
            TypeKind::Char16 => "Char16",
            TypeKind::Char32 => "Char32",
            TypeKind::UShort => "UShort",
            TypeKind::UInt => "UInt",
            TypeKind::ULong => "ULong",
            TypeKind::ULongLong => "ULongLong",
            TypeKind::UInt128 => "UInt128",
            TypeKind::CharS => "Char_S",
            TypeKind::SChar => "SChar",
            TypeKind::WChar => "WChar",
            TypeKind::Short => "Short",
            TypeKind::Int => "Int",
            TypeKind::Long => "Long",
            TypeKind::LongLong => "LongLong",
            TypeKind::Int128 => "Int128",
            TypeKind::Float => "Float",
            TypeKind::Double => "Double",
            TypeKind::LongDouble => "LongDouble",
            TypeKind::NullPtr => "NullPtr",
            TypeKind::Overload => "Overload",
            TypeKind::Dependent => "Dependent",
            TypeKind::ObjCId => "ObjCId",
            TypeKind::ObjCClass => "ObjCClass",
            TypeKind::ObjCSel => "ObjCSel",
            TypeKind::Complex => "Complex",
            TypeKind::Ptr => "Ptr",
            TypeKind::BlockPtr => "BlockPtr",
            TypeKind::LValueRef => "LValueRef",
            TypeKind::RValueRef => "RValueRef",
            TypeKind::Record => "Record",
            TypeKind::Enum => "Enum",
            TypeKind::Typedef => "Typedef",
            TypeKind::ObjCInterface => "ObjCInterface",
            TypeKind::ObjCObjectPointer => "ObjCObjectPointer",
            TypeKind::FunctionNoProto => "FunctionNoProto",
            TypeKind::FunctionProto => "FunctionProto",
            TypeKind::ConstantArray => "ConstantArray",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of an identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum IdKind {
    Variable,
    Type,
    Function,
    Namespace,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdKind::Variable => "variable",
            IdKind::Type => "type",
            IdKind::Function => "function",
            IdKind::Namespace => "namespace",
        })
    }
}
