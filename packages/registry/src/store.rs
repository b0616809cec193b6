use blockdata_model::{ContentStore, DocumentId, MetaStore};
use serde_json::Value;
use std::collections::HashMap;

/// In-memory document content store, addressed by document id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContent {
    documents: HashMap<DocumentId, String>,
}

impl InMemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document_id: DocumentId, content: impl Into<String>) {
        self.documents.insert(document_id, content.into());
    }
}

impl ContentStore for InMemoryContent {
    fn fetch_content(&self, document_id: DocumentId) -> Option<String> {
        self.documents.get(&document_id).cloned()
    }
}

/// In-memory per-document metadata store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMeta {
    entries: HashMap<(DocumentId, String), Value>,
}

impl InMemoryMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document_id: DocumentId, key: impl Into<String>, value: Value) {
        self.entries.insert((document_id, key.into()), value);
    }
}

impl MetaStore for InMemoryMeta {
    fn fetch_meta(&self, document_id: DocumentId, key: &str) -> Option<Value> {
        self.entries.get(&(document_id, key.to_string())).cloned()
    }
}
