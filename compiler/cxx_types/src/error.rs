//! Error types for registry construction and persistence.

use thiserror::Error;

/// Structural violations of the registry's key space.
///
/// These indicate inconsistent input (two declarations of one entity, a
/// reference to something never declared) and abort the current step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("identifier `{name}` already in registry")]
    DuplicateIdentifier { name: String },

    #[error("no type named `{name}` in registry")]
    UnresolvedIdentifier { name: String },

    #[error("`{name}` is not a struct, class or union")]
    NotARecord { name: String },
}

/// Failures while saving or loading a registry.
#[derive(Debug, Error)]
pub enum DistillError {
    #[error("unknown distiller `{name}`")]
    UnknownDistiller { name: String },

    #[error("distiller `{name}` registered twice")]
    DuplicateDistiller { name: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("binary codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("corrupt envelope: {0}")]
    CorruptEnvelope(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Failure inside a distiller that reads a foreign format.
    #[error("ingestion failed: {0}")]
    Ingest(#[source] Box<dyn std::error::Error + Send + Sync>),
}
