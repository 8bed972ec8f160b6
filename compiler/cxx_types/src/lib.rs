//! Registry of C/C++ types and identifiers.
//!
//! The model is a flat, name-keyed table: every cross-reference between
//! identifiers (declaring scope, pointee, base, member, parameter and return
//! types) is stored as a fully qualified name and resolved through a
//! [`Registry`] at query time. This keeps the graph acyclic in memory and
//! makes whole-registry persistence a plain serialization of its entries.
//!
//! # Layout
//!
//! - [`normalize`]: canonical spelling of builtin and template type names
//! - [`scope`]: nested lexical environments with the builtin universe
//! - [`types`]: the closed identifier/type taxonomy
//! - [`registry`]: the arena and its two-phase record build
//! - [`placeholder`]: lazily resolved by-name type handles
//! - [`persist`]: save/load through named distillers

mod error;
mod flags;
mod idx;
mod kind;
pub mod normalize;
pub mod persist;
pub mod placeholder;
pub mod qualname;
pub mod registry;
pub mod scope;
pub mod types;

pub use error::{DistillError, RegistryError};
pub use flags::{Access, TypeQualifiers, TypeSpecifiers};
pub use idx::Idx;
pub use kind::{IdKind, TypeKind};
pub use normalize::{DefaultArg, Normalizer};
pub use persist::{save, BinaryDistiller, Distiller, DistillerTable, MetaData, MetaValue};
pub use placeholder::TypeRef;
pub use registry::Registry;
pub use scope::{ObjKind, Object, Scope};
pub use types::{
    ArrayType, Base, CvQualType, EnumType, Function, FunctionType, FundamentalType, Identifier,
    Member, Namespace, OverloadFunctionSet, Parameter, Prototype, PtrType, RecordType, RefType,
    Type, TypeHeader, TypedefType, UnionType, Variable,
};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debugging registry construction.
///
/// Call this early in main() or in tests to enable tracing output.
/// Tracing is controlled by the `RUST_LOG` environment variable.
///
/// # Examples
///
/// ```bash
/// # Log every registration and overload coalescing
/// RUST_LOG=cxx_types=debug cargo test
///
/// # Trace canonical type naming during ingestion
/// RUST_LOG=cxx_gccxml=trace cargo test
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
