//! Nested lexical environments.
//!
//! A [`Scope`] maps local names to [`Object`]s and optionally points at an
//! enclosing scope. The builtin environment is [`Scope::universe`].
//!
//! # Design
//!
//! Scopes are `Rc`-shared and copy-on-write: creating a child is O(1) and
//! never clones the parent chain, while inserting into a scope that is still
//! shared clones only that scope's own table.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Builtin type spellings known to every scope.
pub const BUILTIN_TYPES: &[&str] = &[
    "void",
    "bool",
    "char",
    "signed char",
    "unsigned char",
    "wchar_t",
    "short",
    "unsigned short",
    "int",
    "unsigned int",
    "long",
    "unsigned long",
    "long long",
    "unsigned long long",
    "float",
    "double",
    "long double",
    "float complex",
    "double complex",
    "long double complex",
];

/// What a scope entry names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ObjKind {
    Bad,
    Type,
    Var,
    Fun,
    Namespace,
}

impl fmt::Display for ObjKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjKind::Bad => "bad",
            ObjKind::Type => "type",
            ObjKind::Var => "var",
            ObjKind::Fun => "func",
            ObjKind::Namespace => "namespace",
        })
    }
}

/// A named entry of a scope.
#[derive(Clone, Debug)]
pub struct Object {
    pub kind: ObjKind,
    pub name: String,
    /// The scope opened by this entry, for namespaces and records.
    pub data: Option<Scope>,
}

impl Object {
    pub fn new(kind: ObjKind, name: impl Into<String>) -> Self {
        Object {
            kind,
            name: name.into(),
            data: None,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.data = Some(scope);
        self
    }
}

#[derive(Clone, Debug, Default)]
struct ScopeInner {
    objects: FxHashMap<String, Object>,
    parent: Option<Scope>,
}

/// A lexical environment.
#[derive(Clone, Debug, Default)]
pub struct Scope(Rc<ScopeInner>);

impl Scope {
    /// An empty scope with no parent.
    pub fn new() -> Self {
        Scope::default()
    }

    /// The builtin environment: fundamental types, `sizeof` and `std`.
    pub fn universe() -> Self {
        let mut universe = Scope::new();
        for name in BUILTIN_TYPES {
            universe.insert(Object::new(ObjKind::Type, *name));
        }
        universe.insert(Object::new(ObjKind::Fun, "sizeof"));
        let std = universe.child();
        universe.insert(Object::new(ObjKind::Namespace, "std").with_scope(std));
        universe
    }

    /// A new empty scope enclosed by this one.
    #[must_use]
    pub fn child(&self) -> Self {
        Scope(Rc::new(ScopeInner {
            objects: FxHashMap::default(),
            parent: Some(self.clone()),
        }))
    }

    pub fn outer(&self) -> Option<&Scope> {
        self.0.parent.as_ref()
    }

    /// Insert `obj` unless its name is already declared locally.
    ///
    /// On conflict the scope is left unchanged and the existing object is
    /// returned.
    pub fn insert(&mut self, obj: Object) -> Option<Object> {
        if let Some(existing) = self.0.objects.get(&obj.name) {
            return Some(existing.clone());
        }
        let inner = Rc::make_mut(&mut self.0);
        inner.objects.insert(obj.name.clone(), obj);
        None
    }

    /// Look up a name in this scope only.
    pub fn lookup(&self, name: &str) -> Option<&Object> {
        self.0.objects.get(name)
    }

    /// Look up a name here, then in each enclosing scope.
    pub fn resolve(&self, name: &str) -> Option<&Object> {
        let mut scope = self;
        loop {
            if let Some(obj) = scope.lookup(name) {
                return Some(obj);
            }
            scope = scope.outer()?;
        }
    }

    pub fn len(&self) -> usize {
        self.0.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.objects.is_empty()
    }

    /// Local names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.objects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scope {{")?;
        for name in self.names() {
            if let Some(obj) = self.lookup(name) {
                writeln!(f, "\t{} {}", obj.kind, obj.name)?;
            }
        }
        write!(f, "}}")
    }
}
