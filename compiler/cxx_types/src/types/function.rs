//! Functions, overload sets and function types.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::TypeHeader;
use crate::{qualname, TypeKind, TypeQualifiers, TypeRef, TypeSpecifiers};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    pub has_default: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>, has_default: bool) -> Self {
        Parameter {
            name: name.into(),
            ty: ty.into(),
            has_default,
        }
    }
}

/// Parameter list and return type shared by functions and function types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prototype {
    pub params: Vec<Parameter>,
    pub ret: TypeRef,
    pub variadic: bool,
}

impl Prototype {
    pub fn new(params: Vec<Parameter>, ret: impl Into<TypeRef>, variadic: bool) -> Self {
        Prototype {
            params,
            ret: ret.into(),
            variadic,
        }
    }

    pub fn num_param(&self) -> usize {
        self.params.len()
    }

    /// The `i`th parameter. Panics if `i` is out of range.
    #[track_caller]
    pub fn param(&self, i: usize) -> &Parameter {
        self.params
            .get(i)
            .unwrap_or_else(|| {
                panic!("param index {i} out of range ({} params)", self.params.len())
            })
    }

    pub fn num_default_param(&self) -> usize {
        self.params.iter().filter(|p| p.has_default).count()
    }
}

/// Render `[inline ][static ]name(type arg, ...)[ const][ -> ret]`.
fn render_signature(
    qualified: &str,
    specifiers: TypeSpecifiers,
    qualifiers: TypeQualifiers,
    proto: &Prototype,
) -> String {
    let mut out = String::new();
    if specifiers.contains(TypeSpecifiers::INLINE) {
        out.push_str("inline ");
    }
    if specifiers.contains(TypeSpecifiers::STATIC) {
        out.push_str("static ");
    }
    out.push_str(qualified);
    out.push('(');

    let mut params: Vec<String> = proto
        .params
        .iter()
        .map(|p| {
            if p.name.is_empty() {
                p.ty.name().to_string()
            } else {
                format!("{} {}", p.ty.name(), p.name)
            }
        })
        .collect();
    if proto.variadic {
        params.push("...".to_string());
    }
    if params.is_empty() && !specifiers.contains(TypeSpecifiers::METHOD) {
        out.push_str("void");
    } else {
        out.push_str(&params.join(", "));
    }
    out.push(')');

    if qualifiers.contains(TypeQualifiers::CONST) {
        out.push_str(" const");
    }
    if !specifiers.intersects(TypeSpecifiers::CONSTRUCTOR | TypeSpecifiers::DESTRUCTOR) {
        let _ = write!(out, " -> {}", proto.ret.name());
    }
    out
}

macro_rules! specifier_queries {
    ($($(#[$doc:meta])* $fn_name:ident => $flag:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $fn_name(&self) -> bool {
                self.specifiers().contains(TypeSpecifiers::$flag)
            }
        )*
    };
}

/// A function declaration: free function, method, constructor, operator...
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub qualified: String,
    pub scope: String,
    pub qualifiers: TypeQualifiers,
    pub specifiers: TypeSpecifiers,
    pub proto: Prototype,
}

impl Function {
    pub fn new(qualified: impl Into<String>, scope: impl Into<String>, proto: Prototype) -> Self {
        Function {
            qualified: qualified.into(),
            scope: scope.into(),
            qualifiers: TypeQualifiers::empty(),
            specifiers: TypeSpecifiers::empty(),
            proto,
        }
    }

    #[must_use]
    pub fn with_specifiers(mut self, specifiers: TypeSpecifiers) -> Self {
        self.specifiers = specifiers;
        self
    }

    #[must_use]
    pub fn with_qualifiers(mut self, qualifiers: TypeQualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    pub fn name(&self) -> &str {
        qualname::strip_scope(&self.qualified, &self.scope)
    }

    pub fn specifiers(&self) -> TypeSpecifiers {
        self.specifiers
    }

    specifier_queries! {
        is_virtual => VIRTUAL,
        is_static => STATIC,
        is_constructor => CONSTRUCTOR,
        is_destructor => DESTRUCTOR,
        is_copy_constructor => COPY_CTOR,
        is_operator => OPERATOR,
        is_method => METHOD,
        is_inline => INLINE,
        is_converter => CONVERTER,
    }

    pub fn is_const(&self) -> bool {
        self.qualifiers.contains(TypeQualifiers::CONST)
    }

    pub fn is_variadic(&self) -> bool {
        self.proto.variadic
    }

    pub fn num_param(&self) -> usize {
        self.proto.num_param()
    }

    #[track_caller]
    pub fn param(&self, i: usize) -> &Parameter {
        self.proto.param(i)
    }

    pub fn num_default_param(&self) -> usize {
        self.proto.num_default_param()
    }

    pub fn return_type(&self) -> &TypeRef {
        &self.proto.ret
    }

    pub fn signature(&self) -> String {
        render_signature(&self.qualified, self.specifiers, self.qualifiers, &self.proto)
    }
}

/// All functions sharing one qualified name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverloadFunctionSet {
    pub qualified: String,
    pub scope: String,
    pub(crate) functions: Vec<Function>,
}

impl OverloadFunctionSet {
    pub(crate) fn new(first: Function) -> Self {
        OverloadFunctionSet {
            qualified: first.qualified.clone(),
            scope: first.scope.clone(),
            functions: vec![first],
        }
    }

    pub fn num_function(&self) -> usize {
        self.functions.len()
    }

    /// The `i`th overload. Panics if `i` is out of range.
    #[track_caller]
    pub fn function(&self, i: usize) -> &Function {
        self.functions
            .get(i)
            .unwrap_or_else(|| panic!("overload index {i} out of range for `{}`", self.qualified))
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn signatures(&self) -> Vec<String> {
        self.functions.iter().map(Function::signature).collect()
    }
}

/// The type of a function or of a pointer-to-member function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionType {
    pub header: TypeHeader,
    pub proto: Prototype,
}

impl FunctionType {
    pub fn new(name: impl Into<String>, proto: Prototype) -> Self {
        FunctionType {
            header: TypeHeader::new(name, "", TypeKind::FunctionProto),
            proto,
        }
    }

    #[must_use]
    pub fn with_specifiers(mut self, specifiers: TypeSpecifiers) -> Self {
        self.header.specifiers = specifiers;
        self
    }

    #[must_use]
    pub fn with_qualifiers(mut self, qualifiers: TypeQualifiers) -> Self {
        self.header.qualifiers = qualifiers;
        self
    }

    pub fn specifiers(&self) -> TypeSpecifiers {
        self.header.specifiers
    }

    specifier_queries! {
        is_virtual => VIRTUAL,
        is_static => STATIC,
        is_method => METHOD,
        is_inline => INLINE,
    }

    pub fn is_variadic(&self) -> bool {
        self.proto.variadic
    }

    pub fn signature(&self) -> String {
        render_signature(
            &self.header.qualified,
            self.header.specifiers,
            self.header.qualifiers,
            &self.proto,
        )
    }
}
