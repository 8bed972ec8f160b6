//! Document traversal.
//!
//! [`walk`] visits the root, then each record in document order, then each
//! record's child elements, calling [`Visitor::visit`] once per node. A
//! visitor returns `false` to skip the children of the node it was handed.
//!
//! # Example
//!
//! ```text
//! let mut fields = 0;
//! walk(&doc, &mut |node: Node<'_>| {
//!     if let Node::Record(r) = node {
//!         fields += usize::from(r.kind == NodeKind::Field);
//!     }
//!     true
//! });
//! ```

use rustc_hash::FxHashMap;
use tracing::info;

use crate::{Argument, BaseSpec, Document, EnumValue, NodeKind, Record};

/// One node of the document tree.
#[derive(Copy, Clone, Debug)]
pub enum Node<'a> {
    Root(&'a Document),
    Record(&'a Record),
    Argument(&'a Record, &'a Argument),
    Ellipsis(&'a Record),
    Base(&'a Record, &'a BaseSpec),
    EnumValue(&'a Record, &'a EnumValue),
}

/// Callback invoked on every visited node.
pub trait Visitor<'a> {
    /// Handle `node`; return whether to descend into its children.
    fn visit(&mut self, node: Node<'a>) -> bool;
}

impl<'a, F> Visitor<'a> for F
where
    F: FnMut(Node<'a>) -> bool,
{
    fn visit(&mut self, node: Node<'a>) -> bool {
        self(node)
    }
}

/// Visit `doc` depth-first.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(doc: &'a Document, visitor: &mut V) {
    if !visitor.visit(Node::Root(doc)) {
        return;
    }
    for record in doc.records() {
        if visitor.visit(Node::Record(record)) {
            walk_children(record, visitor);
        }
    }
}

fn walk_children<'a, V: Visitor<'a> + ?Sized>(record: &'a Record, visitor: &mut V) {
    for arg in &record.arguments {
        visitor.visit(Node::Argument(record, arg));
    }
    if record.ellipsis {
        visitor.visit(Node::Ellipsis(record));
    }
    for base in &record.bases {
        visitor.visit(Node::Base(record, base));
    }
    for value in &record.enum_values {
        visitor.visit(Node::EnumValue(record, value));
    }
}

/// Per-category counts of a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    kinds: FxHashMap<NodeKind, usize>,
    pub arguments: usize,
    pub bases: usize,
    pub enum_values: usize,
}

impl Stats {
    pub fn collect(doc: &Document) -> Self {
        let mut stats = Stats::default();
        walk(doc, &mut stats);
        stats
    }

    /// Records of `kind`.
    pub fn count(&self, kind: NodeKind) -> usize {
        self.kinds.get(&kind).copied().unwrap_or(0)
    }

    /// Records of every kind.
    pub fn total(&self) -> usize {
        self.kinds.values().sum()
    }

    /// Non-zero counts in [`NodeKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeKind, usize)> + '_ {
        NodeKind::ALL
            .into_iter()
            .map(|kind| (kind, self.count(kind)))
            .filter(|&(_, n)| n > 0)
    }

    /// Log the counts at `info`.
    pub fn log(&self) {
        for (kind, n) in self.iter() {
            info!(%kind, count = n, "records");
        }
        info!(
            total = self.total(),
            arguments = self.arguments,
            bases = self.bases,
            enum_values = self.enum_values,
            "document statistics"
        );
    }
}

impl<'a> Visitor<'a> for Stats {
    fn visit(&mut self, node: Node<'a>) -> bool {
        match node {
            Node::Root(_) | Node::Ellipsis(_) => {}
            Node::Record(r) => *self.kinds.entry(r.kind).or_insert(0) += 1,
            Node::Argument(..) => self.arguments += 1,
            Node::Base(..) => self.bases += 1,
            Node::EnumValue(..) => self.enum_values += 1,
        }
        true
    }
}
