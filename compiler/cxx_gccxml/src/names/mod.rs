//! Canonical C++ spelling of GCC-XML ids.
//!
//! Every registry key and every by-name cross-reference comes from
//! [`Namer::type_name`], so two records that denote the same type must get
//! byte-identical spellings. The rules, by category:
//!
//! | record | spelling |
//! |---|---|
//! | global namespace | `""` |
//! | anonymous namespace | `scope::@anonymous@namespace@` |
//! | unnamed record or enum | `scope::@anon@<id>` |
//! | pointer / reference | `T*`, `T&`, `R(*)(A)`, `T(*)[N]` |
//! | cv-qualified | `const T`, `T* const` |
//! | array | `T[N]` with `N = max + 1`, `T[]` when unbounded |
//! | function type | `R()(A, B)`, `R()(void)` |
//! | method type | `R(C::)(A) const` |
//! | offset type | `T C::*` |
//! | class, struct, union | normalized `scope::name` |
//!
//! # Design
//!
//! - Results are memoized per id; the same id always yields the same string
//! - Scopes are found by climbing `context` past unnamed enclosing records,
//!   as C++ name lookup does for members of anonymous unions
//! - An id referenced but not defined whose suffix is a run of `c`/`v`/`r`
//!   is spelled as the qualified form of the id without that suffix
//! - A spelling that depends on itself is a [`IngestError::CyclicReference`]

use cxx_types::{qualname, Normalizer, TypeQualifiers};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::stack::ensure_sufficient_stack;
use crate::{IdIndex, IngestError, NodeKind, Record};

/// Memoizing spelling generator over an indexed document.
pub struct Namer<'a> {
    index: &'a IdIndex<'a>,
    normalizer: &'a Normalizer,
    keep_all_template_args: bool,
    cache: FxHashMap<String, String>,
    /// Ids whose spelling is being computed, innermost last.
    path: Vec<String>,
    visiting: FxHashSet<String>,
}

impl<'a> Namer<'a> {
    pub fn new(
        index: &'a IdIndex<'a>,
        normalizer: &'a Normalizer,
        keep_all_template_args: bool,
    ) -> Self {
        Namer {
            index,
            normalizer,
            keep_all_template_args,
            cache: FxHashMap::default(),
            path: Vec::new(),
            visiting: FxHashSet::default(),
        }
    }

    pub fn index(&self) -> &'a IdIndex<'a> {
        self.index
    }

    /// The canonical spelling of `id`.
    pub fn type_name(&mut self, id: &str) -> Result<String, IngestError> {
        if let Some(name) = self.cache.get(id) {
            return Ok(name.clone());
        }
        if !self.visiting.insert(id.to_string()) {
            return Err(IngestError::CyclicReference { id: id.to_string() });
        }
        self.path.push(id.to_string());
        let result = ensure_sufficient_stack(|| self.spell(id));
        self.path.pop();
        self.visiting.remove(id);

        let name = result?;
        trace!(id, name = %name, "named");
        self.cache.insert(id.to_string(), name.clone());
        Ok(name)
    }

    /// [`Namer::type_name`] for an id found in an attribute of `referrer`,
    /// so an undefined `id` is reported against `referrer`.
    pub fn referenced_name(&mut self, id: &str, referrer: &str) -> Result<String, IngestError> {
        self.path.push(referrer.to_string());
        let result = self.type_name(id);
        self.path.pop();
        result
    }

    /// Qualified name of the scope declaring `id`; `""` for the global
    /// namespace.
    pub fn scope_name(&mut self, id: &str) -> Result<String, IngestError> {
        let record = self.lookup(id)?;
        self.scope_of(record)
    }

    fn scope_of(&mut self, record: &'a Record) -> Result<String, IngestError> {
        let mut context = record.context();
        while let Some(cid) = context {
            let parent = self.index.require(cid, &record.id)?;
            if parent.kind == NodeKind::Namespace || !is_unnamed(parent) {
                return self.type_name(cid);
            }
            context = parent.context();
        }
        Ok(String::new())
    }

    fn lookup(&self, id: &str) -> Result<&'a Record, IngestError> {
        self.index.get(id).ok_or_else(|| self.unknown(id))
    }

    /// [`IngestError::UnknownId`] naming the innermost id being spelled.
    fn unknown(&self, id: &str) -> IngestError {
        let referrer = self.path.iter().rev().find(|p| *p != id);
        IngestError::UnknownId {
            id: id.to_string(),
            referenced_by: referrer.map_or_else(|| "<query>".to_string(), Clone::clone),
        }
    }

    fn spell(&mut self, id: &str) -> Result<String, IngestError> {
        let Some(record) = self.index.get(id) else {
            return self.spell_derived_cv(id);
        };
        let name = match record.kind {
            NodeKind::Namespace => match record.name() {
                "::" => String::new(),
                "" => qualname::join(&self.scope_of(record)?, "@anonymous@namespace@"),
                name => qualname::join(&self.scope_of(record)?, name),
            },
            NodeKind::Class | NodeKind::Struct | NodeKind::Union | NodeKind::Enumeration
                if is_unnamed(record) =>
            {
                qualname::join(&self.scope_of(record)?, &format!("@anon@{}", record.id))
            }
            NodeKind::Class | NodeKind::Struct | NodeKind::Union => {
                let joined = qualname::join(&self.scope_of(record)?, record.name());
                self.normalizer
                    .normalize_class(&joined, self.keep_all_template_args)
            }
            NodeKind::PointerType => {
                let pointee = self.type_name(record.required("type")?)?;
                add_declarator(&pointee, "*")
            }
            NodeKind::ReferenceType => {
                let referent = self.type_name(record.required("type")?)?;
                add_declarator(&referent, "&")
            }
            NodeKind::CvQualifiedType => {
                let underlying = self.type_name(record.required("type")?)?;
                cv_spelling(&underlying, cv_qualifiers(record))
            }
            NodeKind::ArrayType => {
                let elem = self.type_name(record.required("type")?)?;
                add_declarator(&elem, &array_dim(record)?)
            }
            NodeKind::FunctionType => {
                let ret = self.type_name(record.required("returns")?)?;
                format!("{ret}()({})", self.argument_list(record)?)
            }
            NodeKind::MethodType => {
                let ret = self.type_name(record.required("returns")?)?;
                let class = self.type_name(record.required("basetype")?)?;
                let mut name = format!("{ret}({class}::)({})", self.argument_list(record)?);
                if record.flag("const") {
                    name.push_str(" const");
                }
                if record.flag("volatile") {
                    name.push_str(" volatile");
                }
                name
            }
            NodeKind::OffsetType => {
                let ty = self.type_name(record.required("type")?)?;
                let class = self.type_name(record.required("basetype")?)?;
                format!("{ty} {class}::*")
            }
            NodeKind::FundamentalType => self.normalizer.normalize(record.name(), false),
            NodeKind::Destructor => {
                let name = record.name();
                let name = if name.starts_with('~') {
                    name.to_string()
                } else {
                    format!("~{name}")
                };
                qualname::join(&self.scope_of(record)?, &name)
            }
            NodeKind::Unimplemented => {
                let code = record
                    .attr("tree_code_name")
                    .filter(|c| !c.is_empty())
                    .unwrap_or(&record.tag);
                qualname::join(&self.scope_of(record)?, code)
            }
            NodeKind::File => record.name().to_string(),
            NodeKind::NamespaceAlias
            | NodeKind::Enumeration
            | NodeKind::Typedef
            | NodeKind::Function
            | NodeKind::OperatorFunction
            | NodeKind::Method
            | NodeKind::OperatorMethod
            | NodeKind::Constructor
            | NodeKind::Converter
            | NodeKind::Field
            | NodeKind::Variable => qualname::join(&self.scope_of(record)?, record.name()),
        };
        Ok(name)
    }

    /// `A, B, ...` of a function or method type; `void` when empty.
    fn argument_list(&mut self, record: &Record) -> Result<String, IngestError> {
        let mut args = Vec::with_capacity(record.arguments.len() + 1);
        for arg in &record.arguments {
            args.push(self.type_name(&arg.ty)?);
        }
        if record.ellipsis {
            args.push("...".to_string());
        }
        if args.is_empty() {
            return Ok("void".to_string());
        }
        Ok(args.join(", "))
    }

    /// An undefined id like `_12c` or `_12cv`, spelled from `_12`.
    fn spell_derived_cv(&mut self, id: &str) -> Result<String, IngestError> {
        let Some((base, quals)) = split_cv_suffix(id) else {
            return Err(self.unknown(id));
        };
        let underlying = self.type_name(base)?;
        Ok(cv_spelling(&underlying, quals))
    }
}

/// Split `_12cv` into `_12` and its qualifiers. `None` when `id` has no
/// qualifier suffix.
pub(crate) fn split_cv_suffix(id: &str) -> Option<(&str, TypeQualifiers)> {
    let base = id.trim_end_matches(['c', 'v', 'r']);
    if base.is_empty() || base.len() == id.len() {
        return None;
    }
    let mut quals = TypeQualifiers::empty();
    for c in id[base.len()..].chars() {
        quals |= match c {
            'c' => TypeQualifiers::CONST,
            'v' => TypeQualifiers::VOLATILE,
            _ => TypeQualifiers::RESTRICT,
        };
    }
    Some((base, quals))
}

/// Whether a record or enum has no usable name: GCC-XML names unnamed
/// types after their location (`._12`) or a compiler symbol (`$_0`).
pub fn is_unnamed(record: &Record) -> bool {
    let marked = |s: &str| s.replace("...", "").contains(['.', '$']);
    record.name().is_empty() || marked(record.name()) || marked(record.attr_or_empty("demangled"))
}

pub(crate) fn cv_qualifiers(record: &Record) -> TypeQualifiers {
    let mut quals = TypeQualifiers::empty();
    if record.flag("const") {
        quals |= TypeQualifiers::CONST;
    }
    if record.flag("volatile") {
        quals |= TypeQualifiers::VOLATILE;
    }
    if record.flag("restrict") {
        quals |= TypeQualifiers::RESTRICT;
    }
    quals
}

/// `const volatile restrict`, in that order, for the flags set.
fn cv_words(quals: TypeQualifiers) -> String {
    [
        (TypeQualifiers::CONST, "const"),
        (TypeQualifiers::VOLATILE, "volatile"),
        (TypeQualifiers::RESTRICT, "restrict"),
    ]
    .into_iter()
    .filter(|(flag, _)| quals.contains(*flag))
    .map(|(_, word)| word)
    .collect::<Vec<_>>()
    .join(" ")
}

/// Qualify `underlying`: pointers and references take the qualifier after
/// the declarator, everything else before the type.
pub(crate) fn cv_spelling(underlying: &str, quals: TypeQualifiers) -> String {
    let words = cv_words(quals);
    if words.is_empty() {
        return underlying.to_string();
    }
    if underlying.ends_with(['*', '&']) {
        return format!("{underlying} {words}");
    }
    match declarator_group(underlying) {
        Some((open, close)) if underlying[open + 1..close].ends_with(['*', '&']) => {
            format!("{} {words}{}", &underlying[..close], &underlying[close..])
        }
        _ => format!("{words} {underlying}"),
    }
}

/// Element count of an array record; `None` when the bound is absent or
/// negative.
pub(crate) fn array_bound(record: &Record) -> Result<Option<u64>, IngestError> {
    let max = record.attr_or_empty("max").trim_end_matches('u');
    if max.is_empty() {
        return Ok(None);
    }
    let max: i64 = max.parse().map_err(|_| IngestError::InvalidInteger {
        id: record.id.clone(),
        attr: "max",
        value: max.to_string(),
    })?;
    Ok(u64::try_from(max).ok().map(|m| m.saturating_add(1)))
}

fn array_dim(record: &Record) -> Result<String, IngestError> {
    Ok(match array_bound(record)? {
        Some(len) => format!("[{len}]"),
        None => "[]".to_string(),
    })
}

/// Apply a pointer, reference or array declarator to a type spelling.
///
/// Function and member-function spellings carry their declarator inside
/// the first parenthesized group (`R(*)(A)`), so the new declarator joins
/// it. A pointer to an array needs such a group (`T(*)[N]`), and an array
/// of arrays adds its dimension outermost (`T[2][3]`).
pub(crate) fn add_declarator(base: &str, decl: &str) -> String {
    if let Some((_, close)) = declarator_group(base) {
        return format!("{}{decl}{}", &base[..close], &base[close..]);
    }
    if let Some(bracket) = top_level_find(base, '[') {
        let (head, dims) = base.split_at(bracket);
        return if decl.starts_with('[') {
            format!("{head}{decl}{dims}")
        } else {
            format!("{head}({decl}){dims}")
        };
    }
    format!("{base}{decl}")
}

/// Byte range of the first top-level `( ... )` when it holds a declarator
/// rather than a parameter list: empty, `C::`, or a run of `*`/`&`.
fn declarator_group(spelling: &str) -> Option<(usize, usize)> {
    let open = top_level_find(spelling, '(')?;
    let mut depth = 0usize;
    let mut close = None;
    for (i, c) in spelling[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;
    let inner = &spelling[open + 1..close];
    let tail = inner.rfind("::").map_or(inner, |pos| &inner[pos + 2..]);
    let is_declarator = inner.is_empty()
        || inner.starts_with(['*', '&'])
        || (inner.contains("::") && tail.chars().all(|c| matches!(c, '*' | '&')));
    is_declarator.then_some((open, close))
}

/// First `needle` outside template angle brackets.
fn top_level_find(spelling: &str, needle: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in spelling.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if c == needle && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests;
