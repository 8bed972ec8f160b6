//! Qualifier, specifier and access flags that decorate types.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// cv-qualification of a type.
    ///
    /// An empty set means unqualified. A cv-qualified type reports its own
    /// qualifiers; the qualifiers of the type it decorates are not folded in.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
    pub struct TypeQualifiers: u8 {
        const CONST = 1 << 0;
        const RESTRICT = 1 << 1;
        const VOLATILE = 1 << 2;
    }
}

impl fmt::Display for TypeQualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<none>");
        }
        let mut first = true;
        for (word, flag) in [
            ("const", Self::CONST),
            ("restrict", Self::RESTRICT),
            ("volatile", Self::VOLATILE),
        ] {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(word)?;
                first = false;
            }
        }
        Ok(())
    }
}

bitflags! {
    /// Declaration specifiers attached to functions, variables and types.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
    pub struct TypeSpecifiers: u32 {
        // === Storage (bits 0-7) ===

        const REGISTER = 1 << 0;
        const VIRTUAL = 1 << 1;
        const STATIC = 1 << 2;
        const INLINE = 1 << 3;
        const EXTERN = 1 << 4;

        // === Member function roles (bits 8-15) ===

        const CONSTRUCTOR = 1 << 8;
        const DESTRUCTOR = 1 << 9;
        const COPY_CTOR = 1 << 10;
        const OPERATOR = 1 << 11;
        const CONVERTER = 1 << 12;
        /// Declared inside a class; rendered without `void` when parameterless.
        const METHOD = 1 << 13;
        const EXPLICIT = 1 << 14;

        // === Miscellaneous (bits 16-23) ===

        const AUTO = 1 << 16;
        const MUTABLE = 1 << 17;
        /// Pure virtual function, or a class declaring one.
        const ABSTRACT = 1 << 18;
        const TRANSIENT = 1 << 19;
        /// Compiler-generated.
        const ARTIFICIAL = 1 << 20;
    }
}

/// C++ access control level of a member or base class.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Access {
    Private,
    Protected,
    #[default]
    Public,
}

impl Access {
    /// Parse an access keyword. An empty string means `public`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" | "public" => Some(Access::Public),
            "protected" => Some(Access::Protected),
            "private" => Some(Access::Private),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Access::Private => "private",
            Access::Protected => "protected",
            Access::Public => "public",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
