//! The parsed GCC-XML document and its id table.
//!
//! Parsing copies every top-level element of the `<GCC_XML>` (or
//! `<CastXML>`) root into an owned [`Record`], so the XML text can be
//! dropped as soon as [`Document::parse`] returns. Child elements that only
//! make sense inside their owner (`<Argument>`, `<Ellipsis>`, `<Base>`,
//! `<EnumValue>`) are folded into that owner's record.
//!
//! # Design
//!
//! Ids are opaque strings (`_1`, `_42c`). [`IdIndex`] borrows the document
//! and maps each id to its record; it is rebuilt after any mutation rather
//! than kept in sync.

use std::io::Read;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::walk::{walk, Node};
use crate::{Argument, BaseSpec, EnumValue, IngestError, NodeKind, Record};

/// Accepted root element names.
const ROOT_TAGS: [&str; 2] = ["GCC_XML", "CastXML"];

/// An owned GCC-XML document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    root: String,
    records: Vec<Record>,
}

impl Document {
    /// Parse a document from its text.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn parse(text: &str) -> Result<Self, IngestError> {
        let xml = roxmltree::Document::parse(text)?;
        let root = xml.root_element();
        let root_tag = root.tag_name().name();
        if !ROOT_TAGS.contains(&root_tag) {
            return Err(IngestError::UnexpectedRoot {
                found: root_tag.to_string(),
            });
        }

        let mut records = Vec::new();
        for elem in root.children().filter(roxmltree::Node::is_element) {
            records.push(parse_record(elem)?);
        }
        debug!(root = root_tag, records = records.len(), "parsed document");
        Ok(Document {
            root: root_tag.to_string(),
            records,
        })
    }

    /// Read all of `source` and parse it.
    pub fn from_reader(mut source: impl Read) -> Result<Self, IngestError> {
        let mut text = String::new();
        source.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    /// Build a document from records directly.
    pub fn from_records(records: Vec<Record>) -> Self {
        Document {
            root: ROOT_TAGS[0].to_string(),
            records,
        }
    }

    /// Root element name: `GCC_XML` or `CastXML`.
    pub fn root_tag(&self) -> &str {
        &self.root
    }

    /// Records in document order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Records of one category, in document order.
    pub fn of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_record(elem: roxmltree::Node<'_, '_>) -> Result<Record, IngestError> {
    let tag = elem.tag_name().name();
    let id = elem
        .attribute("id")
        .ok_or_else(|| IngestError::MissingAttribute {
            id: format!("<{tag}>"),
            attr: "id",
        })?;

    let mut record = Record::new(tag, id);
    for attr in elem.attributes() {
        if attr.name() != "id" {
            record.set_attr(attr.name(), attr.value());
        }
    }

    for child in elem.children().filter(roxmltree::Node::is_element) {
        let attr = |name: &str| child.attribute(name).unwrap_or("").to_string();
        match child.tag_name().name() {
            "Argument" => {
                let ty = required_child_attr(&record, child, "type")?;
                record.arguments.push(Argument {
                    name: attr("name"),
                    ty,
                    default: child.attribute("default").map(str::to_string),
                });
            }
            "Ellipsis" => record.ellipsis = true,
            "Base" => {
                let ty = required_child_attr(&record, child, "type")?;
                record.bases.push(BaseSpec {
                    ty,
                    access: attr("access"),
                    offset: attr("offset"),
                    is_virtual: !matches!(child.attribute("virtual"), None | Some("" | "0")),
                });
            }
            "EnumValue" => record.enum_values.push(EnumValue {
                name: attr("name"),
                init: attr("init"),
            }),
            other => debug!(id = %record.id, child = other, "ignored child element"),
        }
    }
    Ok(record)
}

fn required_child_attr(
    owner: &Record,
    child: roxmltree::Node<'_, '_>,
    attr: &'static str,
) -> Result<String, IngestError> {
    child
        .attribute(attr)
        .map(str::to_string)
        .ok_or_else(|| IngestError::MissingAttribute {
            id: format!("{}/<{}>", owner.id, child.tag_name().name()),
            attr,
        })
}

/// Borrowed `id -> record` table over a [`Document`].
#[derive(Debug, Default)]
pub struct IdIndex<'d> {
    by_id: FxHashMap<&'d str, &'d Record>,
}

impl<'d> IdIndex<'d> {
    /// Walk `doc` and index every record by id.
    ///
    /// A repeated id replaces the earlier record.
    #[tracing::instrument(level = "debug", skip_all, fields(records = doc.len()))]
    pub fn build(doc: &'d Document) -> Self {
        let mut by_id: FxHashMap<&'d str, &'d Record> = FxHashMap::default();
        walk(doc, &mut |node: Node<'d>| match node {
            Node::Root(_) => true,
            Node::Record(record) => {
                if by_id.insert(record.id.as_str(), record).is_some() {
                    debug!(id = %record.id, tag = %record.tag, "duplicate id, later record wins");
                }
                false
            }
            _ => false,
        });
        IdIndex { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'d Record> {
        self.by_id.get(id).copied()
    }

    /// The record for `id`, or [`IngestError::UnknownId`] naming the referrer.
    pub fn require(&self, id: &str, referenced_by: &str) -> Result<&'d Record, IngestError> {
        self.get(id).ok_or_else(|| IngestError::UnknownId {
            id: id.to_string(),
            referenced_by: referenced_by.to_string(),
        })
    }

    /// Whether `record` is the one its id resolves to. False for a record
    /// shadowed by a later duplicate.
    pub fn is_canonical(&self, record: &Record) -> bool {
        self.get(&record.id)
            .is_some_and(|indexed| std::ptr::eq(indexed, record))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
