use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Declared value type of a block attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    RichText,
}

/// Extraction strategy for a sourced attribute.
///
/// An attribute whose schema carries no source is filled from the block's
/// inline configuration only. `Children` and `Node` are retained for
/// backward compatibility with content produced before tree-shaped sources
/// were deprecated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeSource {
    Attribute,
    Html,
    Text,
    RichText,
    Query,
    Tag,
    Meta,
    Raw,
    Children,
    Node,
}

/// Declaration of a single block attribute: its type, extraction strategy,
/// and strategy parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSchema {
    pub name: String,

    #[serde(rename = "type")]
    pub value_type: ValueType,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<AttributeSource>,

    /// CSS selector scoping the extraction. Absent means "the current
    /// element" (the fragment root, or the matched element inside `query`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub selector: Option<String>,

    /// HTML attribute name read by the `attribute` source.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attribute: Option<String>,

    /// Child tag joined by the `html` source's multiline mode.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub multiline: Option<String>,

    /// Key read from the external meta store by the `meta` source.
    #[serde(rename = "meta", skip_serializing_if = "Option::is_none", default)]
    pub meta_key: Option<String>,

    /// Nested attribute schemas applied per match by the `query` source,
    /// in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub query: Vec<AttributeSchema>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<Value>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            source: None,
            selector: None,
            attribute: None,
            multiline: None,
            meta_key: None,
            query: Vec::new(),
            default: None,
        }
    }

    pub fn sourced(mut self, source: AttributeSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_multiline(mut self, tag: impl Into<String>) -> Self {
        self.multiline = Some(tag.into());
        self
    }

    pub fn with_meta_key(mut self, key: impl Into<String>) -> Self {
        self.meta_key = Some(key.into());
        self
    }

    pub fn with_query(mut self, query: Vec<AttributeSchema>) -> Self {
        self.query = query;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A registered block type: its declared attributes plus the context values
/// it provides to descendant blocks and binding providers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockDefinition {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attributes: Vec<AttributeSchema>,

    /// Context key -> attribute name. The resolved value of the named
    /// attribute becomes visible to descendants under the context key.
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub provides_context: HashMap<String, String>,
}

impl BlockDefinition {
    pub fn new(attributes: Vec<AttributeSchema>) -> Self {
        Self {
            attributes,
            provides_context: HashMap::new(),
        }
    }

    pub fn providing_context(
        mut self,
        context_key: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        self.provides_context
            .insert(context_key.into(), attribute.into());
        self
    }

    /// Look up a declared attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
