use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One node of the tokenized document tree.
///
/// Produced by the external [`Tokenizer`](crate::external::Tokenizer) and
/// consumed read-only by the engine. `inner_html` is the block's own markup
/// with child-block markup excluded; child blocks appear in `inner_blocks`
/// in document order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawBlockNode {
    /// Namespaced block name (`namespace/kind`). `None` for free-text gaps
    /// between block delimiters.
    pub name: Option<String>,

    /// Inline JSON configuration from the block delimiter, in source order.
    #[serde(default)]
    pub attrs: Map<String, Value>,

    /// Raw HTML fragment, possibly spanning multiple top-level nodes.
    #[serde(default)]
    pub inner_html: String,

    /// Nested blocks, in document order.
    #[serde(default)]
    pub inner_blocks: Vec<RawBlockNode>,
}

impl RawBlockNode {
    /// A named block node with no configuration, markup, or children.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A free-text gap node.
    pub fn gap(html: impl Into<String>) -> Self {
        Self {
            name: None,
            inner_html: html.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = html.into();
        self
    }

    pub fn with_inner_blocks(mut self, inner: Vec<RawBlockNode>) -> Self {
        self.inner_blocks = inner;
        self
    }
}
