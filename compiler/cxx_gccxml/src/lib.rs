//! GCC-XML ingestion for the `cxx_types` registry.
//!
//! A GCC-XML (or CastXML) document is a flat list of elements, one per
//! declaration or type, that refer to each other through opaque ids. This
//! crate turns that description into name-keyed registry entries.
//!
//! # Pipeline
//!
//! 1. [`Document::parse`] reads the XML into owned [`Record`]s
//! 2. [`fixup`] repairs GCC-XML spelling quirks in place
//! 3. [`IdIndex::build`] walks the document into an `id -> record` table
//! 4. [`Namer`] derives the canonical spelling of any id, memoized
//! 5. [`ingest`] registers every record, category by category
//!
//! Cross-references are written as names, so records can be registered in
//! any order; the registry's lazy type references resolve them on first use.
//!
//! The pipeline is also reachable as the `"gccxml"` distiller; see
//! [`register_distiller`].

mod error;
pub mod document;
pub mod fixup;
pub mod ingest;
pub mod names;
mod node;
mod stack;
pub mod walk;

pub use document::{Document, IdIndex};
pub use error::IngestError;
pub use fixup::fixup;
pub use ingest::{ingest, GccXmlDistiller, IngestOptions};
pub use names::Namer;
pub use node::{Argument, BaseSpec, EnumValue, NodeKind, Record};
pub use walk::{walk, Node, Stats, Visitor};

use cxx_types::{DistillError, DistillerTable};

/// Register the GCC-XML reader under `"gccxml"` with default options.
pub fn register_distiller(table: &mut DistillerTable) -> Result<(), DistillError> {
    table.register("gccxml", Box::new(GccXmlDistiller::default()))
}
