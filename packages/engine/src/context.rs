use blockdata_model::DocumentId;
use serde_json::Value;
use std::collections::HashMap;

/// Ambient state threaded through recursive resolution.
///
/// Carries the identity of the document being parsed and the named values
/// provided by ancestor blocks. The map is copy-on-descend: a block that
/// provides context extends a clone for its children, so a node sees the
/// union of its ancestors' values and never its siblings'.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseContext {
    document_id: Option<DocumentId>,
    document_kind: Option<String>,
    values: HashMap<String, Value>,
}

impl ParseContext {
    pub fn new(document_id: Option<DocumentId>) -> Self {
        Self {
            document_id,
            ..Self::default()
        }
    }

    pub fn with_document_kind(mut self, kind: impl Into<String>) -> Self {
        self.document_kind = Some(kind.into());
        self
    }

    pub fn document_id(&self) -> Option<DocumentId> {
        self.document_id
    }

    pub fn document_kind(&self) -> Option<&str> {
        self.document_kind.as_deref()
    }

    /// Ancestor-provided value under `key`, if any.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Clone of this context extended with additional provided values.
    /// Existing keys are shadowed, never mutated in place.
    pub fn descend_with(&self, entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut child = self.clone();
        child.values.extend(entries);
        child
    }
}
