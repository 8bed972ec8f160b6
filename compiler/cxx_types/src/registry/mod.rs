//! The flat, name-keyed identifier store.
//!
//! Every identifier lives in one dense arena slot addressed by an [`Idx`];
//! a hash index maps fully qualified names to slots. Entries are never
//! removed, so an `Idx` stays valid for the registry's lifetime.
//!
//! # Design
//!
//! - Functions sharing a name coalesce into one [`OverloadFunctionSet`] entry
//! - Enumerators of an unscoped enum are also entered in the enum's
//!   enclosing scope, as C++ name lookup sees them
//! - Records are built in two phases: [`Registry::register`] the shell,
//!   then attach [`Registry::set_members`] and [`Registry::set_bases`]
//! - Every key a step would add is checked before anything is inserted, so
//!   a failed step leaves the registry unchanged

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::types::{Base, EnumType, Identifier, Member, OverloadFunctionSet, Type};
use crate::{qualname, Idx, RegistryError};

#[derive(Clone, Debug)]
struct Entry {
    key: String,
    id: Identifier,
}

/// The identifier store.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: Vec<Entry>,
    by_name: FxHashMap<String, Idx>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries. An overload set counts once.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register an identifier under its fully qualified name.
    ///
    /// A function joins the overload set of its name, creating it if needed.
    /// An enum also enters its enumerators into the enclosing scope. Any
    /// other name collision is a [`RegistryError::DuplicateIdentifier`].
    pub fn register(&mut self, id: impl Into<Identifier>) -> Result<Idx, RegistryError> {
        match id.into() {
            Identifier::Function(f) => {
                let key = f.qualified.clone();
                match self.by_name.get(&key).copied() {
                    Some(idx) => match &mut self.entries[idx.index()].id {
                        Identifier::OverloadSet(set) => {
                            set.functions.push(f);
                            debug!(name = %key, overloads = set.functions.len(), "added overload");
                            Ok(idx)
                        }
                        _ => Err(RegistryError::DuplicateIdentifier { name: key }),
                    },
                    None => {
                        let set = OverloadFunctionSet::new(f);
                        Ok(self.push(key, Identifier::OverloadSet(set)))
                    }
                }
            }
            Identifier::Type(Type::Enum(e)) => self.register_enum(e),
            other => {
                let key = other.qualified_name().into_owned();
                self.ensure_vacant(&key)?;
                Ok(self.push(key, other))
            }
        }
    }

    /// Register an enum and enter each enumerator in the enum's enclosing
    /// scope.
    pub fn register_enum(&mut self, e: EnumType) -> Result<Idx, RegistryError> {
        let key = e.header.qualified.clone();
        self.ensure_vacant(&key)?;
        let leaked: Vec<(String, Member)> = e
            .members
            .iter()
            .map(|m| (m.qualified_name(), m.clone()))
            .collect();
        for (name, _) in &leaked {
            self.ensure_vacant(name)?;
        }

        let idx = self.push(key, Identifier::Type(Type::Enum(e)));
        for (name, m) in leaked {
            self.push(name, Identifier::Member(m));
        }
        Ok(idx)
    }

    /// Insert `id` under `key`, replacing whatever was there.
    ///
    /// This is the merge used when loading a persisted registry; it performs
    /// no coalescing and no enumerator leaking, since persisted content
    /// already holds both.
    pub fn insert_or_replace(&mut self, key: impl Into<String>, id: Identifier) -> Idx {
        let key = key.into();
        match self.by_name.get(&key).copied() {
            Some(idx) => {
                debug!(name = %key, "replaced registry entry");
                self.entries[idx.index()].id = id;
                idx
            }
            None => self.push(key, id),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Identifier> {
        self.index_of(name).map(|idx| &self.entries[idx.index()].id)
    }

    /// Look up `name`, yielding it only if it names a type.
    pub fn lookup_type(&self, name: &str) -> Option<&Type> {
        self.lookup(name).and_then(Identifier::as_type)
    }

    pub fn index_of(&self, name: &str) -> Option<Idx> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, idx: Idx) -> Option<&Identifier> {
        self.entries.get(idx.index()).map(|e| &e.id)
    }

    /// The entry at `idx`. Panics if `idx` came from another registry.
    #[track_caller]
    pub fn entry(&self, idx: Idx) -> &Identifier {
        self.get(idx)
            .unwrap_or_else(|| panic!("{idx:?} out of range ({} entries)", self.entries.len()))
    }

    /// Every registered name, sorted.
    pub fn all_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.iter().map(|e| e.key.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Identifier)> {
        self.entries.iter().map(|e| (e.key.as_str(), &e.id))
    }

    /// The entry for the scope that declares `id`; `None` for the global
    /// scope or an unregistered scope.
    pub fn decl_scope(&self, id: &Identifier) -> Option<&Identifier> {
        match id.scope() {
            "" => None,
            scope => self.lookup(scope),
        }
    }

    /// Attach the members of a struct, class or union, in declaration order.
    ///
    /// Each member's scope becomes the record. Named data members are also
    /// registered as `record::member`.
    pub fn set_members(&mut self, record: &str, members: Vec<Member>) -> Result<(), RegistryError> {
        self.set_members_in(record, record, members)
    }

    /// [`Registry::set_members`] for a record whose data members are visible
    /// from `scope`, as the members of an anonymous union are from the
    /// enclosing class. Named data members are registered as `scope::member`
    /// and declared in `scope`.
    pub fn set_members_in(
        &mut self,
        record: &str,
        scope: &str,
        members: Vec<Member>,
    ) -> Result<(), RegistryError> {
        let idx = self.record_slot(record, true)?;
        let members: Vec<Member> = members
            .into_iter()
            .map(|m| Member {
                scope: record.to_string(),
                ..m
            })
            .collect();
        let exposed: Vec<(String, Member)> = members
            .iter()
            .filter(|m| m.is_data_member() && !m.name.is_empty())
            .map(|m| {
                let exposed = Member {
                    scope: scope.to_string(),
                    ..m.clone()
                };
                (qualname::join(scope, &m.name), exposed)
            })
            .collect();
        for (name, _) in &exposed {
            self.ensure_vacant(name)?;
        }

        debug!(record, members = members.len(), "attached members");
        match &mut self.entries[idx.index()].id {
            Identifier::Type(Type::Struct(r) | Type::Class(r)) => r.replace_members(members),
            Identifier::Type(Type::Union(u)) => u.replace_members(members),
            _ => {
                return Err(RegistryError::NotARecord {
                    name: record.to_string(),
                })
            }
        }
        for (name, m) in exposed {
            self.push(name, Identifier::Member(m));
        }
        Ok(())
    }

    /// Attach the base specifiers of a struct or class.
    pub fn set_bases(&mut self, record: &str, bases: Vec<Base>) -> Result<(), RegistryError> {
        let idx = self.record_slot(record, false)?;
        debug!(record, bases = bases.len(), "attached bases");
        match &mut self.entries[idx.index()].id {
            Identifier::Type(Type::Struct(r) | Type::Class(r)) => {
                r.replace_bases(bases);
                Ok(())
            }
            _ => Err(RegistryError::NotARecord {
                name: record.to_string(),
            }),
        }
    }

    /// Slot of a record type; unions qualify only when `allow_union`.
    fn record_slot(&self, record: &str, allow_union: bool) -> Result<Idx, RegistryError> {
        let idx = self
            .index_of(record)
            .ok_or_else(|| RegistryError::UnresolvedIdentifier {
                name: record.to_string(),
            })?;
        match &self.entries[idx.index()].id {
            Identifier::Type(Type::Struct(_) | Type::Class(_)) => Ok(idx),
            Identifier::Type(Type::Union(_)) if allow_union => Ok(idx),
            _ => Err(RegistryError::NotARecord {
                name: record.to_string(),
            }),
        }
    }

    fn ensure_vacant(&self, name: &str) -> Result<(), RegistryError> {
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateIdentifier {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn push(&mut self, key: String, id: Identifier) -> Idx {
        let idx = Idx::from_len(self.entries.len());
        debug!(name = %key, kind = %id.kind(), ?idx, "registered");
        self.by_name.insert(key.clone(), idx);
        self.entries.push(Entry { key, id });
        idx
    }
}
