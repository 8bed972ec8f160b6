//! Registration of a GCC-XML document's records.
//!
//! [`ingest`] runs the whole pipeline over a [`Document`]: fixup, indexing,
//! statistics and then one registration pass per category, in an order
//! that registers every scope before the declarations inside it:
//!
//! 1. fundamentals
//! 2. namespaces and namespace aliases
//! 3. enumerations
//! 4. classes, structs and unions (every shell first, then members and bases)
//! 5. typedefs
//! 6. pointers, references, cv-qualified, arrays, offset, function and
//!    method types
//! 7. free functions and operators
//! 8. methods, constructors, destructors, converters and operator methods
//! 9. namespace-scope variables
//!
//! # Design
//!
//! - Cross-references are written as canonical spellings from [`Namer`],
//!   so pass order never matters for correctness
//! - Sizes and kinds of referenced types are computed from the records
//!   themselves, not from registry entries that may not exist yet
//! - Structural types whose spelling is already registered are reused
//! - Work happens on a copy of the registry that replaces the original only
//!   when every pass succeeded

use std::io::Read;

use cxx_types::{
    qualname, Access, ArrayType, Base, CvQualType, DistillError, Distiller, EnumType, Function,
    FunctionType, FundamentalType, Identifier, Member, MetaData, MetaValue, Namespace, Normalizer,
    ObjKind, Parameter, Prototype, PtrType, RecordType, RefType, Registry, Scope, Type, TypeKind,
    TypeSpecifiers, TypedefType, UnionType, Variable,
};
use tracing::{debug, info, trace};

use crate::names::{array_bound, cv_qualifiers, is_unnamed, split_cv_suffix};
use crate::node::parse_uint;
use crate::stack::ensure_sufficient_stack;
use crate::{fixup, Document, IdIndex, IngestError, Namer, NodeKind, Record, Stats};

/// Longest typedef/cv/array chain followed when sizing a type.
const MAX_TYPE_CHAIN: usize = 1024;

/// Knobs of the ingestion pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestOptions {
    /// Keep template arguments equal to their declared defaults.
    pub keep_all_template_args: bool,
    /// Pointer size in bytes, for pointer records without a `size`.
    pub pointer_size: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            keep_all_template_args: false,
            pointer_size: 8,
        }
    }
}

/// Fix up `doc` and register all of its records into `registry`.
///
/// On error the registry is left as it was.
#[tracing::instrument(level = "debug", skip_all, fields(records = doc.len()))]
pub fn ingest(
    doc: &mut Document,
    registry: &mut Registry,
    normalizer: &Normalizer,
    options: &IngestOptions,
) -> Result<Stats, IngestError> {
    fixup(doc, normalizer);
    let doc: &Document = doc;
    let stats = Stats::collect(doc);
    stats.log();

    let index = IdIndex::build(doc);
    let mut staged = registry.clone();
    Ingester {
        doc,
        index: &index,
        namer: Namer::new(&index, normalizer, options.keep_all_template_args),
        universe: Scope::universe(),
        registry: &mut staged,
        options,
    }
    .run()?;

    info!(
        added = staged.count().saturating_sub(registry.count()),
        total = staged.count(),
        "ingested document"
    );
    *registry = staged;
    Ok(stats)
}

struct Ingester<'a, 'r> {
    doc: &'a Document,
    index: &'a IdIndex<'a>,
    namer: Namer<'a>,
    /// Builtin spellings, for classifying fundamental types.
    universe: Scope,
    registry: &'r mut Registry,
    options: &'a IngestOptions,
}

impl<'a> Ingester<'a, '_> {
    fn run(&mut self) -> Result<(), IngestError> {
        self.fundamentals()?;
        self.namespaces()?;
        self.enums()?;
        self.records()?;
        self.typedefs()?;
        self.structural_types()?;
        self.functions()?;
        self.variables()
    }

    /// Records of the selected kinds, in document order, skipping records
    /// shadowed by a later duplicate id.
    fn select(&self, wanted: impl Fn(NodeKind) -> bool) -> Vec<&'a Record> {
        let doc: &'a Document = self.doc;
        let index = self.index;
        doc.records()
            .iter()
            .filter(|r| wanted(r.kind))
            .filter(|r| {
                let canonical = index.is_canonical(r);
                if !canonical {
                    debug!(id = %r.id, tag = %r.tag, "skipped shadowed record");
                }
                canonical
            })
            .collect()
    }

    fn fundamentals(&mut self) -> Result<(), IngestError> {
        for r in self.select(|k| k == NodeKind::FundamentalType) {
            let name = self.namer.type_name(&r.id)?;
            let kind = builtin_kind(&self.universe, &name)?;
            let size = bits_to_bytes(r.uint("size")?);
            self.register_type(Type::Fundamental(FundamentalType::new(name, size, kind)))?;
        }
        Ok(())
    }

    fn namespaces(&mut self) -> Result<(), IngestError> {
        for r in self.select(|k| k == NodeKind::Namespace) {
            if r.name() == "::" {
                continue;
            }
            let name = self.namer.type_name(&r.id)?;
            if matches!(self.registry.lookup(&name), Some(Identifier::Namespace(_))) {
                debug!(%name, "namespace reopened");
                continue;
            }
            let scope = self.namer.scope_name(&r.id)?;
            self.registry.register(Namespace::new(name, scope))?;
        }
        for r in self.select(|k| k == NodeKind::NamespaceAlias) {
            let name = self.namer.type_name(&r.id)?;
            let scope = self.namer.scope_name(&r.id)?;
            let target = self.namer.referenced_name(r.required("namespace")?, &r.id)?;
            let mut alias = Namespace::new(name, scope);
            alias.alias_of = Some(target);
            self.registry.register(alias)?;
        }
        Ok(())
    }

    fn enums(&mut self) -> Result<(), IngestError> {
        for r in self.select(|k| k == NodeKind::Enumeration) {
            let name = self.namer.type_name(&r.id)?;
            let scope = self.namer.scope_name(&r.id)?;
            let size = bits_to_bytes(r.uint("size")?);
            let mut members = Vec::with_capacity(r.enum_values.len());
            for value in &r.enum_values {
                members.push(Member::enumerator(
                    value.name.as_str(),
                    enum_value(&r.id, &value.init)?,
                ));
            }
            self.registry
                .register_enum(EnumType::new(name, scope, size, members))?;
        }
        Ok(())
    }

    fn records(&mut self) -> Result<(), IngestError> {
        let records = self.select(NodeKind::is_record);
        for r in &records {
            let name = self.namer.type_name(&r.id)?;
            let scope = self.namer.scope_name(&r.id)?;
            let size = bits_to_bytes(r.uint("size")?);
            let ty = if r.kind == NodeKind::Union {
                Type::Union(UnionType::with_size(name, scope, size))
            } else {
                let mut record = RecordType::new(name, scope, size);
                if r.flag("abstract") {
                    record.header.specifiers |= TypeSpecifiers::ABSTRACT;
                }
                if r.kind == NodeKind::Struct {
                    Type::Struct(record)
                } else {
                    Type::Class(record)
                }
            };
            self.registry.register(ty)?;
        }

        for r in records {
            let name = self.namer.type_name(&r.id)?;
            let members = self.members_of(r, &name)?;
            if is_unnamed(r) {
                // members of an anonymous union are looked up in its enclosing scope
                let scope = self.namer.scope_name(&r.id)?;
                self.registry.set_members_in(&name, &scope, members)?;
            } else {
                self.registry.set_members(&name, members)?;
            }
            if r.kind != NodeKind::Union && !r.bases.is_empty() {
                let bases = self.bases_of(r)?;
                self.registry.set_bases(&name, bases)?;
            }
        }
        Ok(())
    }

    /// Data members and member functions of a record, in declaration order.
    /// Nested types are registered on their own and are not members.
    fn members_of(&mut self, record: &'a Record, name: &str) -> Result<Vec<Member>, IngestError> {
        let mut members = Vec::new();
        for id in record.member_ids() {
            let m = self.index.require(id, &record.id)?;
            let member = match m.kind {
                NodeKind::Field => {
                    let ty_id = m.required("type")?;
                    let ty = self.type_ref(ty_id, &m.id)?;
                    let kind = self.kind_of(ty_id, &m.id)?;
                    let offset = bits_to_bytes(m.uint("offset")?);
                    Member::new(m.name(), ty, kind, access(m)?, offset)
                }
                NodeKind::Variable => {
                    let ty_id = m.required("type")?;
                    let ty = self.type_ref(ty_id, &m.id)?;
                    let kind = self.kind_of(ty_id, &m.id)?;
                    Member::new(m.name(), ty, kind, access(m)?, 0)
                }
                kind if kind.is_member_function() => {
                    let qualified = self.namer.type_name(&m.id)?;
                    let local = qualname::strip_scope(&qualified, name).to_string();
                    let ty = self.member_function_type(m, name)?;
                    Member::new(local, ty, TypeKind::FunctionProto, access(m)?, 0)
                }
                other => {
                    trace!(record = %record.id, member = %m.id, kind = %other, "not a member");
                    continue;
                }
            };
            members.push(member);
        }
        Ok(members)
    }

    fn bases_of(&mut self, record: &'a Record) -> Result<Vec<Base>, IngestError> {
        let mut bases = Vec::with_capacity(record.bases.len());
        for base in &record.bases {
            let ty = self.type_ref(&base.ty, &record.id)?;
            let access = Access::parse(&base.access).ok_or_else(|| IngestError::InvalidAccess {
                id: record.id.clone(),
                value: base.access.clone(),
            })?;
            let offset = parse_uint(&record.id, "offset", &base.offset)?;
            bases.push(Base::new(ty, access, offset, base.is_virtual));
        }
        Ok(bases)
    }

    /// Register the function type of a member function and return its
    /// spelling: `R(C::)(A) const`, or `R()(A)` when static.
    ///
    /// The registered type carries what its spelling denotes and nothing
    /// else, so it equals the `FunctionType`/`MethodType` record of the same
    /// spelling: parameters are unnamed and undefaulted, and a static member
    /// gets a plain function type.
    fn member_function_type(&mut self, m: &'a Record, class: &str) -> Result<String, IngestError> {
        let proto = type_only(self.prototype(m)?);
        let args = {
            let mut args: Vec<&str> = proto.params.iter().map(|p| p.ty.name()).collect();
            if proto.variadic {
                args.push("...");
            }
            if args.is_empty() {
                "void".to_string()
            } else {
                args.join(", ")
            }
        };

        let ret = proto.ret.name().to_string();
        let (name, ty) = if m.flag("static") {
            let name = format!("{ret}()({args})");
            let ty = FunctionType::new(name.as_str(), proto);
            (name, ty)
        } else {
            let mut name = format!("{ret}({class}::)({args})");
            if m.flag("const") {
                name.push_str(" const");
            }
            if m.flag("volatile") {
                name.push_str(" volatile");
            }
            let ty = FunctionType::new(name.as_str(), proto)
                .with_specifiers(TypeSpecifiers::METHOD)
                .with_qualifiers(cv_qualifiers(m));
            (name, ty)
        };
        self.register_type(Type::Function(ty))?;
        Ok(name)
    }

    fn typedefs(&mut self) -> Result<(), IngestError> {
        for r in self.select(|k| k == NodeKind::Typedef) {
            let name = self.namer.type_name(&r.id)?;
            let target_id = r.required("type")?;
            let target = self.type_ref(target_id, &r.id)?;
            if target == name {
                debug!(%name, "skipped typedef naming its own target");
                continue;
            }
            let scope = self.namer.scope_name(&r.id)?;
            let size = self.size_of(target_id, &r.id)?;
            self.registry
                .register(Type::Typedef(TypedefType::new(name, scope, target, size)))?;
        }
        Ok(())
    }

    fn structural_types(&mut self) -> Result<(), IngestError> {
        for kind in [
            NodeKind::PointerType,
            NodeKind::ReferenceType,
            NodeKind::CvQualifiedType,
            NodeKind::ArrayType,
            NodeKind::OffsetType,
            NodeKind::FunctionType,
            NodeKind::MethodType,
        ] {
            for r in self.select(|k| k == kind) {
                let ty = self.structural_type(r)?;
                self.register_type(ty)?;
            }
        }
        Ok(())
    }

    fn structural_type(&mut self, r: &'a Record) -> Result<Type, IngestError> {
        let name = self.namer.type_name(&r.id)?;
        let ty = match r.kind {
            NodeKind::PointerType => {
                let pointee = self.type_ref(r.required("type")?, &r.id)?;
                Type::Ptr(PtrType::named(name, pointee, self.pointer_size(r)?))
            }
            NodeKind::ReferenceType => {
                let referent = self.type_ref(r.required("type")?, &r.id)?;
                Type::Ref(RefType::named(name, referent, self.pointer_size(r)?))
            }
            NodeKind::CvQualifiedType => {
                let ty_id = r.required("type")?;
                let underlying = self.type_ref(ty_id, &r.id)?;
                let size = self.size_of(ty_id, &r.id)?;
                let kind = self.kind_of(ty_id, &r.id)?;
                Type::CvQualified(CvQualType::new(name, underlying, cv_qualifiers(r), size, kind))
            }
            NodeKind::ArrayType => {
                let elem = self.type_ref(r.required("type")?, &r.id)?;
                let len = array_bound(r)?.unwrap_or(0);
                let size = self.size_of(&r.id, &r.id)?;
                Type::Array(ArrayType::named(name, elem, len, size))
            }
            NodeKind::OffsetType => {
                let pointee = self.type_ref(r.required("type")?, &r.id)?;
                let class = self.type_ref(r.required("basetype")?, &r.id)?;
                let mut ptr = PtrType::named(name, pointee, self.pointer_size(r)?);
                ptr.member_of = Some(class);
                Type::Ptr(ptr)
            }
            NodeKind::FunctionType => {
                Type::Function(FunctionType::new(name, type_only(self.prototype(r)?)))
            }
            _ => {
                let proto = type_only(self.prototype(r)?);
                Type::Function(
                    FunctionType::new(name, proto)
                        .with_specifiers(TypeSpecifiers::METHOD)
                        .with_qualifiers(cv_qualifiers(r)),
                )
            }
        };
        Ok(ty)
    }

    fn functions(&mut self) -> Result<(), IngestError> {
        let free = |k: NodeKind| matches!(k, NodeKind::Function | NodeKind::OperatorFunction);
        for r in self.select(free) {
            let f = self.function(r)?;
            self.registry.register(f)?;
        }
        for r in self.select(NodeKind::is_member_function) {
            let f = self.function(r)?;
            self.registry.register(f)?;
        }
        Ok(())
    }

    fn function(&mut self, r: &'a Record) -> Result<Function, IngestError> {
        let qualified = self.namer.type_name(&r.id)?;
        let scope = self.namer.scope_name(&r.id)?;
        let proto = self.prototype(r)?;

        let mut specifiers = match r.kind {
            NodeKind::OperatorFunction => TypeSpecifiers::OPERATOR,
            NodeKind::Method => TypeSpecifiers::METHOD,
            NodeKind::OperatorMethod => TypeSpecifiers::METHOD | TypeSpecifiers::OPERATOR,
            NodeKind::Constructor => TypeSpecifiers::METHOD | TypeSpecifiers::CONSTRUCTOR,
            NodeKind::Destructor => TypeSpecifiers::METHOD | TypeSpecifiers::DESTRUCTOR,
            NodeKind::Converter => TypeSpecifiers::METHOD | TypeSpecifiers::CONVERTER,
            _ => TypeSpecifiers::empty(),
        };
        for (attr, flag) in [
            ("extern", TypeSpecifiers::EXTERN),
            ("inline", TypeSpecifiers::INLINE),
            ("static", TypeSpecifiers::STATIC),
            ("virtual", TypeSpecifiers::VIRTUAL),
            ("pure_virtual", TypeSpecifiers::ABSTRACT),
            ("explicit", TypeSpecifiers::EXPLICIT),
            ("artificial", TypeSpecifiers::ARTIFICIAL),
        ] {
            if r.flag(attr) {
                specifiers |= flag;
            }
        }
        if r.kind == NodeKind::Constructor && is_copy_constructor(&proto, &scope) {
            specifiers |= TypeSpecifiers::COPY_CTOR;
        }

        Ok(Function::new(qualified, scope, proto)
            .with_specifiers(specifiers)
            .with_qualifiers(cv_qualifiers(r)))
    }

    fn variables(&mut self) -> Result<(), IngestError> {
        for r in self.select(|k| k == NodeKind::Variable) {
            if r.flag("artificial") {
                continue;
            }
            // static data members are attached to their record
            let at_namespace_scope = match r.context() {
                Some(ctx) => self.index.require(ctx, &r.id)?.kind == NodeKind::Namespace,
                None => true,
            };
            if !at_namespace_scope {
                continue;
            }
            let qualified = self.namer.type_name(&r.id)?;
            let scope = self.namer.scope_name(&r.id)?;
            let ty = self.type_ref(r.required("type")?, &r.id)?;
            let mut specifiers = TypeSpecifiers::empty();
            if r.flag("extern") {
                specifiers |= TypeSpecifiers::EXTERN;
            }
            if r.flag("static") {
                specifiers |= TypeSpecifiers::STATIC;
            }
            self.registry.register(Variable {
                qualified,
                scope,
                ty: ty.into(),
                specifiers,
            })?;
        }
        Ok(())
    }

    fn prototype(&mut self, r: &'a Record) -> Result<Prototype, IngestError> {
        let mut params = Vec::with_capacity(r.arguments.len());
        for arg in &r.arguments {
            let ty = self.type_ref(&arg.ty, &r.id)?;
            params.push(Parameter::new(arg.name.as_str(), ty, arg.default.is_some()));
        }
        let ret = match r.attr("returns") {
            Some(id) if !id.is_empty() => self.type_ref(id, &r.id)?,
            _ => "void".to_string(),
        };
        Ok(Prototype::new(params, ret, r.ellipsis))
    }

    /// The spelling of `id`, referenced from `referrer`, as a type
    /// reference. An undefined cv id (`_12c`) gets its cv-qualified type
    /// registered on the way.
    fn type_ref(&mut self, id: &str, referrer: &str) -> Result<String, IngestError> {
        let name = self.namer.referenced_name(id, referrer)?;
        if self.index.get(id).is_none() {
            if let Some((base, quals)) = split_cv_suffix(id) {
                let underlying = self.type_ref(base, referrer)?;
                let ty = CvQualType::new(
                    name.as_str(),
                    underlying,
                    quals,
                    self.size_of(base, id)?,
                    self.kind_of(base, id)?,
                );
                self.register_type(Type::CvQualified(ty))?;
            }
        }
        Ok(name)
    }

    /// Register a type unless its spelling is already a registered type.
    fn register_type(&mut self, ty: Type) -> Result<(), IngestError> {
        if let Some(Identifier::Type(existing)) = self.registry.lookup(ty.qualified_name()) {
            debug!(name = %existing.qualified_name(), "reused registered type");
            return Ok(());
        }
        self.registry.register(ty)?;
        Ok(())
    }

    fn pointer_size(&self, r: &Record) -> Result<u64, IngestError> {
        Ok(match bits_to_bytes(r.uint("size")?) {
            0 => self.options.pointer_size,
            size => size,
        })
    }

    /// Kind of the type `id`; a cv-qualified type reports the kind of the
    /// type it decorates.
    fn kind_of(&self, id: &str, referrer: &str) -> Result<TypeKind, IngestError> {
        let mut id = id;
        for _ in 0..MAX_TYPE_CHAIN {
            let Some(r) = self.index.get(id) else {
                id = self.cv_base(id, referrer)?;
                continue;
            };
            let kind = match r.kind {
                NodeKind::CvQualifiedType => {
                    id = r.required("type")?;
                    continue;
                }
                NodeKind::FundamentalType => builtin_kind(&self.universe, r.name())?,
                NodeKind::PointerType | NodeKind::OffsetType => TypeKind::Ptr,
                NodeKind::ReferenceType => TypeKind::LValueRef,
                NodeKind::Class | NodeKind::Struct | NodeKind::Union => TypeKind::Record,
                NodeKind::Enumeration => TypeKind::Enum,
                NodeKind::Typedef => TypeKind::Typedef,
                NodeKind::ArrayType => TypeKind::ConstantArray,
                NodeKind::FunctionType | NodeKind::MethodType => TypeKind::FunctionProto,
                _ => TypeKind::Unexposed,
            };
            return Ok(kind);
        }
        Err(IngestError::CyclicReference { id: id.to_string() })
    }

    /// Size in bytes of the type `id`.
    fn size_of(&self, id: &str, referrer: &str) -> Result<u64, IngestError> {
        self.size_at(id, referrer, 0)
    }

    fn size_at(&self, id: &str, referrer: &str, depth: usize) -> Result<u64, IngestError> {
        if depth >= MAX_TYPE_CHAIN {
            return Err(IngestError::CyclicReference { id: id.to_string() });
        }
        let Some(r) = self.index.get(id) else {
            let base = self.cv_base(id, referrer)?;
            return self.size_at(base, referrer, depth + 1);
        };
        ensure_sufficient_stack(|| match r.kind {
            NodeKind::CvQualifiedType | NodeKind::Typedef => {
                self.size_at(r.required("type")?, &r.id, depth + 1)
            }
            NodeKind::FunctionType | NodeKind::MethodType => Ok(0),
            NodeKind::PointerType | NodeKind::ReferenceType | NodeKind::OffsetType => {
                self.pointer_size(r)
            }
            NodeKind::ArrayType => match bits_to_bytes(r.uint("size")?) {
                0 => {
                    let len = array_bound(r)?.unwrap_or(0);
                    let elem = self.size_at(r.required("type")?, &r.id, depth + 1)?;
                    Ok(elem.saturating_mul(len))
                }
                size => Ok(size),
            },
            _ => Ok(bits_to_bytes(r.uint("size")?)),
        })
    }

    /// Base id of an undefined cv id, or [`IngestError::UnknownId`].
    fn cv_base<'i>(&self, id: &'i str, referrer: &str) -> Result<&'i str, IngestError> {
        split_cv_suffix(id)
            .map(|(base, _)| base)
            .ok_or_else(|| IngestError::UnknownId {
                id: id.to_string(),
                referenced_by: referrer.to_string(),
            })
    }
}

/// Kind of a canonical builtin spelling. Universe types without a dedicated
/// kind and compiler extension types (`__float128`, `__builtin_va_list`)
/// are `Unexposed`.
fn builtin_kind(universe: &Scope, name: &str) -> Result<TypeKind, IngestError> {
    if let Some(kind) = TypeKind::from_builtin(name) {
        return Ok(kind);
    }
    let declared = universe
        .lookup(name)
        .is_some_and(|obj| obj.kind == ObjKind::Type);
    match name {
        "decltype(nullptr)" | "std::nullptr_t" => Ok(TypeKind::NullPtr),
        n if declared || n.starts_with("__") || n.starts_with("_Float") => {
            debug!(name = n, "builtin without a dedicated kind");
            Ok(TypeKind::Unexposed)
        }
        _ => Err(IngestError::UnknownBuiltin {
            name: name.to_string(),
        }),
    }
}

/// `proto` as a function type sees it: parameter types only.
fn type_only(proto: Prototype) -> Prototype {
    let params = proto
        .params
        .into_iter()
        .map(|p| Parameter::new("", p.ty, false))
        .collect();
    Prototype::new(params, proto.ret, proto.variadic)
}

fn bits_to_bytes(bits: u64) -> u64 {
    bits / 8
}

fn access(r: &Record) -> Result<Access, IngestError> {
    let value = r.attr_or_empty("access");
    Access::parse(value).ok_or_else(|| IngestError::InvalidAccess {
        id: r.id.clone(),
        value: value.to_string(),
    })
}

/// An enumerator's value. Values above `i64::MAX` keep their bit pattern.
#[allow(clippy::cast_possible_wrap, reason = "unsigned enumerators keep their bit pattern")]
fn enum_value(id: &str, init: &str) -> Result<i64, IngestError> {
    let init = init.trim();
    if init.is_empty() {
        return Ok(0);
    }
    init.parse::<i64>()
        .or_else(|_| init.parse::<u64>().map(|v| v as i64))
        .map_err(|_| IngestError::InvalidInteger {
            id: id.to_string(),
            attr: "init",
            value: init.to_string(),
        })
}

/// `C(C&)` or `C(const C&)`, with any further parameters defaulted.
fn is_copy_constructor(proto: &Prototype, class: &str) -> bool {
    let Some((first, rest)) = proto.params.split_first() else {
        return false;
    };
    let ty = first.ty.name();
    let by_ref = ty.strip_suffix('&').is_some_and(|t| {
        let t = t.strip_prefix("const ").unwrap_or(t);
        t == class
    });
    by_ref && rest.iter().all(|p| p.has_default)
}

/// Reads GCC-XML through the [`Distiller`] interface.
#[derive(Clone, Debug, Default)]
pub struct GccXmlDistiller {
    pub normalizer: Normalizer,
    pub options: IngestOptions,
}

impl GccXmlDistiller {
    pub fn new(normalizer: Normalizer, options: IngestOptions) -> Self {
        GccXmlDistiller {
            normalizer,
            options,
        }
    }

    pub fn ingest_str(&self, text: &str, registry: &mut Registry) -> Result<Stats, IngestError> {
        let mut doc = Document::parse(text)?;
        ingest(&mut doc, registry, &self.normalizer, &self.options)
    }

    pub fn ingest_reader(
        &self,
        source: impl Read,
        registry: &mut Registry,
    ) -> Result<Stats, IngestError> {
        let mut doc = Document::from_reader(source)?;
        ingest(&mut doc, registry, &self.normalizer, &self.options)
    }
}

impl Distiller for GccXmlDistiller {
    fn load(
        &self,
        source: &mut dyn Read,
        registry: &mut Registry,
    ) -> Result<MetaData, DistillError> {
        let stats = self.ingest_reader(source, registry)?;
        Ok(metadata(&stats))
    }
}

/// `source`, total `records` and per-category `counts`.
fn metadata(stats: &Stats) -> MetaData {
    let to_int = |n: usize| MetaValue::Int(i64::try_from(n).unwrap_or(i64::MAX));
    let counts = stats
        .iter()
        .map(|(kind, n)| (kind.to_string(), to_int(n)))
        .collect();
    let mut meta = MetaData::new();
    meta.insert("source".to_string(), MetaValue::from("gccxml"));
    meta.insert("records".to_string(), to_int(stats.total()));
    meta.insert("counts".to_string(), MetaValue::Map(counts));
    meta
}
