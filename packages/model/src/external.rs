//! Interfaces of the external collaborators the engine depends on.
//!
//! Each collaborator is an object-safe trait with a single lookup or invoke
//! method, so hosts can register concrete providers dynamically and the
//! engine depends only on the interface. In-memory implementations suitable
//! for embedding and testing live in the `blockdata-registry` crate.

use crate::node::RawBlockNode;
use crate::schema::BlockDefinition;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Ambient identifier of the document being parsed.
pub type DocumentId = i64;

/// Splits a raw document string into a block-node tree.
///
/// Deterministic and pure; tokenization failures are not modeled — a
/// document with no recognizable block markup tokenizes to gap nodes.
pub trait Tokenizer {
    fn tokenize(&self, document_text: &str) -> Vec<RawBlockNode>;
}

/// Lookup of registered block types by name.
pub trait SchemaRegistry {
    fn lookup(&self, block_name: &str) -> Option<&BlockDefinition>;

    /// All registered block names, in no particular order.
    fn list_all(&self) -> Vec<String>;
}

/// Stored document content, addressed by id. Backs pattern expansion.
pub trait ContentStore {
    fn fetch_content(&self, document_id: DocumentId) -> Option<String>;
}

/// Per-document key-value metadata. Backs the `meta` extraction source.
pub trait MetaStore {
    fn fetch_meta(&self, document_id: DocumentId, key: &str) -> Option<Value>;
}

/// Error raised by a binding provider. Caught per-block by the engine.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct BindingError(pub String);

impl BindingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Context object handed to a binding provider.
///
/// Contains only the ancestor-provided values the provider declared in
/// `uses_context`, plus the ambient `documentId` / `documentType` keys when
/// declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingContext {
    values: HashMap<String, Value>,
}

impl BindingContext {
    pub fn new(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An externally registered provider for bound attribute values.
pub trait BindingSource {
    /// Context keys this provider consumes. Only these keys are visible in
    /// the [`BindingContext`] it receives.
    fn uses_context(&self) -> &[String] {
        &[]
    }

    /// Produce the bound value. `Ok(Some(_))` replaces the fallback value
    /// unconditionally; `Ok(None)` leaves the fallback untouched.
    fn value(
        &self,
        args: &Map<String, Value>,
        block_name: &str,
        context: &BindingContext,
    ) -> Result<Option<Value>, BindingError>;
}

/// Lookup of binding providers by source id.
pub trait BindingSourceRegistry {
    fn lookup(&self, source_id: &str) -> Option<&dyn BindingSource>;
}
