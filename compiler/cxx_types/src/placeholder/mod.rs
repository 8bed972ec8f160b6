//! Lazily resolved by-name type handles.
//!
//! A [`TypeRef`] names a type that may not be registered yet. The first
//! query against a registry resolves the name and memoizes the arena slot;
//! later queries go straight to the slot.
//!
//! # Design
//!
//! - Only the name is persisted; a deserialized handle starts unresolved
//! - The memo is checked against the slot's name before use, so a handle
//!   queried against a different registry re-resolves instead of aliasing
//! - `Cell` keeps resolution behind `&self`, which makes the owning
//!   registry `!Sync`

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Identifier, Idx, Registry, RegistryError, Type, TypeKind, TypeQualifiers};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Resolution {
    #[default]
    Unresolved,
    Resolved(Idx),
}

/// A reference to a type by fully qualified name.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef {
    name: String,
    #[serde(skip)]
    state: Cell<Resolution>,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        TypeRef {
            name: name.into(),
            state: Cell::new(Resolution::Unresolved),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state.get(), Resolution::Resolved(_))
    }

    /// Resolve the name, memoizing the result.
    ///
    /// Fails with [`RegistryError::UnresolvedIdentifier`] when the name is
    /// absent or names something other than a type.
    pub fn resolve<'r>(&self, registry: &'r Registry) -> Result<&'r Type, RegistryError> {
        if let Resolution::Resolved(idx) = self.state.get() {
            if let Some(Identifier::Type(ty)) = registry.get(idx) {
                if ty.qualified_name() == self.name {
                    return Ok(ty);
                }
            }
        }
        let unresolved = || RegistryError::UnresolvedIdentifier {
            name: self.name.clone(),
        };
        let idx = registry.index_of(&self.name).ok_or_else(unresolved)?;
        match registry.get(idx) {
            Some(Identifier::Type(ty)) => {
                tracing::trace!(name = %self.name, ?idx, "resolved type reference");
                self.state.set(Resolution::Resolved(idx));
                Ok(ty)
            }
            _ => Err(unresolved()),
        }
    }

    pub fn size(&self, registry: &Registry) -> Result<u64, RegistryError> {
        self.resolve(registry)?.size(registry)
    }

    pub fn kind(&self, registry: &Registry) -> Result<TypeKind, RegistryError> {
        Ok(self.resolve(registry)?.kind())
    }

    pub fn qualifiers(&self, registry: &Registry) -> Result<TypeQualifiers, RegistryError> {
        Ok(self.resolve(registry)?.qualifiers())
    }

    /// The declaring scope of the referenced type; `None` for the global scope.
    pub fn decl_scope<'r>(
        &self,
        registry: &'r Registry,
    ) -> Result<Option<&'r Identifier>, RegistryError> {
        let scope = self.resolve(registry)?.scope();
        Ok(registry.lookup(scope))
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeRef {}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::new(name)
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        TypeRef::new(name)
    }
}
