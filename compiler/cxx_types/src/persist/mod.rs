//! Whole-registry persistence through named distillers.
//!
//! [`save`] writes one envelope holding every key, the matching entry and an
//! open metadata bag. Loading goes through a [`DistillerTable`], which maps
//! a format name to a [`Distiller`]; `"binary"` reads what `save` writes, and
//! other crates register readers for foreign formats.
//!
//! # Design
//!
//! - Keys are written sorted, so equal registries produce equal bytes
//! - Type references are persisted by name and start unresolved on load
//! - Loading merges with overwrite semantics; the envelope is validated in
//!   full before the first entry is merged

use std::collections::BTreeMap;
use std::io::{Read, Write};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{DistillError, Identifier, Registry};

/// Free-form metadata stored alongside a registry.
pub type MetaData = BTreeMap<String, MetaValue>;

/// One metadata value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<MetaValue>),
    Map(BTreeMap<String, MetaValue>),
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Str(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Str(s)
    }
}

impl From<i64> for MetaValue {
    fn from(n: i64) -> Self {
        MetaValue::Int(n)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    #[serde(rename = "Keys")]
    keys: Vec<&'a str>,
    #[serde(rename = "Content")]
    content: Vec<&'a Identifier>,
    #[serde(rename = "MetaData")]
    metadata: &'a MetaData,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "Keys")]
    keys: Vec<String>,
    #[serde(rename = "Content")]
    content: Vec<Identifier>,
    #[serde(rename = "MetaData")]
    metadata: MetaData,
}

impl Envelope {
    fn validate(&self) -> Result<(), DistillError> {
        if self.keys.len() != self.content.len() {
            return Err(DistillError::CorruptEnvelope(format!(
                "{} keys for {} entries",
                self.keys.len(),
                self.content.len()
            )));
        }
        for (key, id) in self.keys.iter().zip(&self.content) {
            if *key != id.qualified_name() {
                return Err(DistillError::CorruptEnvelope(format!(
                    "key `{key}` holds `{}`",
                    id.qualified_name()
                )));
            }
        }
        Ok(())
    }
}

/// Write `registry` and `metadata` to `dest` in the binary format.
#[tracing::instrument(level = "debug", skip_all, fields(entries = registry.count()))]
pub fn save<W: Write>(
    registry: &Registry,
    mut dest: W,
    metadata: &MetaData,
) -> Result<(), DistillError> {
    let mut sorted: Vec<(&str, &Identifier)> = registry.iter().collect();
    sorted.sort_unstable_by_key(|(key, _)| *key);
    let (keys, content) = sorted.into_iter().unzip();

    let envelope = EnvelopeRef {
        keys,
        content,
        metadata,
    };
    bincode::serialize_into(&mut dest, &envelope)?;
    dest.flush()?;
    Ok(())
}

/// A reader that fills a registry from some serialized form.
pub trait Distiller {
    /// Merge the contents of `source` into `registry`, returning the
    /// metadata bag that accompanied them.
    fn load(&self, source: &mut dyn Read, registry: &mut Registry)
        -> Result<MetaData, DistillError>;
}

/// Reads what [`save`] writes.
#[derive(Copy, Clone, Debug, Default)]
pub struct BinaryDistiller;

impl Distiller for BinaryDistiller {
    #[tracing::instrument(level = "debug", skip_all)]
    fn load(
        &self,
        source: &mut dyn Read,
        registry: &mut Registry,
    ) -> Result<MetaData, DistillError> {
        let envelope: Envelope = bincode::deserialize_from(source)?;
        envelope.validate()?;
        debug!(entries = envelope.keys.len(), "merging persisted registry");
        for (key, id) in envelope.keys.into_iter().zip(envelope.content) {
            registry.insert_or_replace(key, id);
        }
        Ok(envelope.metadata)
    }
}

/// Format name to distiller.
#[derive(Default)]
pub struct DistillerTable {
    distillers: FxHashMap<String, Box<dyn Distiller>>,
}

impl DistillerTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding the `"binary"` distiller.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        table
            .distillers
            .insert("binary".to_string(), Box::new(BinaryDistiller));
        table
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        distiller: Box<dyn Distiller>,
    ) -> Result<(), DistillError> {
        let name = name.into();
        if self.distillers.contains_key(&name) {
            return Err(DistillError::DuplicateDistiller { name });
        }
        debug!(%name, "registered distiller");
        self.distillers.insert(name, distiller);
        Ok(())
    }

    /// Load `source` into `registry` with the distiller called `name`.
    pub fn load(
        &self,
        name: &str,
        source: &mut dyn Read,
        registry: &mut Registry,
    ) -> Result<MetaData, DistillError> {
        let distiller =
            self.distillers
                .get(name)
                .ok_or_else(|| DistillError::UnknownDistiller {
                    name: name.to_string(),
                })?;
        distiller.load(source, registry)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.distillers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
