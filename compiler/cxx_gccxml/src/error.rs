//! Ingestion errors.

use cxx_types::{DistillError, RegistryError};
use thiserror::Error;

/// Failures while reading or translating a GCC-XML document.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("expected a <GCC_XML> or <CastXML> root element, found <{found}>")]
    UnexpectedRoot { found: String },

    #[error("{id}: missing `{attr}` attribute")]
    MissingAttribute { id: String, attr: &'static str },

    #[error("id `{id}` referenced by {referenced_by} is not defined")]
    UnknownId { id: String, referenced_by: String },

    #[error("{id}: `{attr}` is not a valid integer: {value:?}")]
    InvalidInteger {
        id: String,
        attr: &'static str,
        value: String,
    },

    #[error("{id}: unknown access specifier {value:?}")]
    InvalidAccess { id: String, value: String },

    #[error("unknown builtin type `{name}`")]
    UnknownBuiltin { name: String },

    #[error("{id}: type spelling depends on itself")]
    CyclicReference { id: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl From<IngestError> for DistillError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Io(e) => DistillError::Io(e),
            IngestError::Registry(e) => DistillError::Registry(e),
            other => DistillError::Ingest(Box::new(other)),
        }
    }
}
