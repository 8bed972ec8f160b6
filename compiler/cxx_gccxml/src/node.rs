//! Owned records of a GCC-XML document.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::IngestError;

/// Category of a top-level GCC-XML element.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum NodeKind {
    Namespace,
    NamespaceAlias,
    Class,
    Struct,
    Union,
    Enumeration,
    Function,
    OperatorFunction,
    Method,
    OperatorMethod,
    Constructor,
    Destructor,
    Converter,
    Field,
    Variable,
    Typedef,
    FundamentalType,
    ArrayType,
    PointerType,
    ReferenceType,
    CvQualifiedType,
    OffsetType,
    FunctionType,
    MethodType,
    File,
    /// Anything else, including elements GCC-XML itself marks unimplemented.
    Unimplemented,
}

impl NodeKind {
    pub const ALL: [NodeKind; 26] = [
        NodeKind::Namespace,
        NodeKind::NamespaceAlias,
        NodeKind::Class,
        NodeKind::Struct,
        NodeKind::Union,
        NodeKind::Enumeration,
        NodeKind::Function,
        NodeKind::OperatorFunction,
        NodeKind::Method,
        NodeKind::OperatorMethod,
        NodeKind::Constructor,
        NodeKind::Destructor,
        NodeKind::Converter,
        NodeKind::Field,
        NodeKind::Variable,
        NodeKind::Typedef,
        NodeKind::FundamentalType,
        NodeKind::ArrayType,
        NodeKind::PointerType,
        NodeKind::ReferenceType,
        NodeKind::CvQualifiedType,
        NodeKind::OffsetType,
        NodeKind::FunctionType,
        NodeKind::MethodType,
        NodeKind::File,
        NodeKind::Unimplemented,
    ];

    /// Category of an element tag; unknown tags are `Unimplemented`.
    pub fn from_tag(tag: &str) -> Self {
        NodeKind::ALL
            .into_iter()
            .find(|k| k.tag() == tag)
            .unwrap_or(NodeKind::Unimplemented)
    }

    pub const fn tag(self) -> &'static str {
        match self {
            NodeKind::Namespace => "Namespace",
            NodeKind::NamespaceAlias => "NamespaceAlias",
            NodeKind::Class => "Class",
            NodeKind::Struct => "Struct",
            NodeKind::Union => "Union",
            NodeKind::Enumeration => "Enumeration",
            NodeKind::Function => "Function",
            NodeKind::OperatorFunction => "OperatorFunction",
            NodeKind::Method => "Method",
            NodeKind::OperatorMethod => "OperatorMethod",
            NodeKind::Constructor => "Constructor",
            NodeKind::Destructor => "Destructor",
            NodeKind::Converter => "Converter",
            NodeKind::Field => "Field",
            NodeKind::Variable => "Variable",
            NodeKind::Typedef => "Typedef",
            NodeKind::FundamentalType => "FundamentalType",
            NodeKind::ArrayType => "ArrayType",
            NodeKind::PointerType => "PointerType",
            NodeKind::ReferenceType => "ReferenceType",
            NodeKind::CvQualifiedType => "CvQualifiedType",
            NodeKind::OffsetType => "OffsetType",
            NodeKind::FunctionType => "FunctionType",
            NodeKind::MethodType => "MethodType",
            NodeKind::File => "File",
            NodeKind::Unimplemented => "Unimplemented",
        }
    }

    pub const fn is_record(self) -> bool {
        matches!(self, NodeKind::Class | NodeKind::Struct | NodeKind::Union)
    }

    /// Functions declared inside a record.
    pub const fn is_member_function(self) -> bool {
        matches!(
            self,
            NodeKind::Method
                | NodeKind::OperatorMethod
                | NodeKind::Constructor
                | NodeKind::Destructor
                | NodeKind::Converter
        )
    }

    pub const fn is_operator(self) -> bool {
        matches!(
            self,
            NodeKind::OperatorFunction | NodeKind::OperatorMethod | NodeKind::Converter
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An `<Argument>` of a function, method or function type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub ty: String,
    pub default: Option<String>,
}

/// A `<Base>` of a class or struct. `offset` is in bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseSpec {
    pub ty: String,
    pub access: String,
    pub offset: String,
    pub is_virtual: bool,
}

/// An `<EnumValue>` of an enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub init: String,
}

/// One top-level element with its attributes and child elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub kind: NodeKind,
    /// Element tag as written; differs from `kind.tag()` for unknown tags.
    pub tag: String,
    pub id: String,
    attrs: FxHashMap<String, String>,
    pub arguments: Vec<Argument>,
    pub ellipsis: bool,
    pub bases: Vec<BaseSpec>,
    pub enum_values: Vec<EnumValue>,
}

impl Record {
    pub fn new(tag: impl Into<String>, id: impl Into<String>) -> Self {
        let tag = tag.into();
        Record {
            kind: NodeKind::from_tag(&tag),
            tag,
            id: id.into(),
            attrs: FxHashMap::default(),
            arguments: Vec::new(),
            ellipsis: false,
            bases: Vec::new(),
            enum_values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The attribute, or `""` when absent.
    pub fn attr_or_empty(&self, name: &str) -> &str {
        self.attr(name).unwrap_or("")
    }

    pub fn required(&self, attr: &'static str) -> Result<&str, IngestError> {
        self.attr(attr).ok_or_else(|| IngestError::MissingAttribute {
            id: self.id.clone(),
            attr,
        })
    }

    /// GCC-XML booleans: absent, `""` and `"0"` are false.
    pub fn flag(&self, name: &str) -> bool {
        !matches!(self.attr(name), None | Some("" | "0"))
    }

    /// A non-negative integer attribute; absent or empty reads as zero.
    pub fn uint(&self, attr: &'static str) -> Result<u64, IngestError> {
        parse_uint(&self.id, attr, self.attr_or_empty(attr))
    }

    pub fn name(&self) -> &str {
        self.attr_or_empty("name")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_attr("name", name);
    }

    /// Id of the enclosing declaration; `None` for the global namespace.
    pub fn context(&self) -> Option<&str> {
        self.attr("context").filter(|c| !c.is_empty())
    }

    /// Ids listed in the space-separated `members` attribute.
    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.attr_or_empty("members").split_whitespace()
    }
}

pub(crate) fn parse_uint(id: &str, attr: &'static str, value: &str) -> Result<u64, IngestError> {
    if value.is_empty() {
        return Ok(0);
    }
    value.parse().map_err(|_| IngestError::InvalidInteger {
        id: id.to_string(),
        attr,
        value: value.to_string(),
    })
}
