use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One fully resolved block.
///
/// `attributes` holds the final, type-coerced values in declaration order.
/// A key is either present with a real value or wholly absent — an attribute
/// that resolved to nothing is never represented by a null placeholder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedBlock {
    pub name: String,

    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub attributes: Map<String, Value>,

    #[serde(
        rename = "innerBlocks",
        skip_serializing_if = "Vec::is_empty",
        default
    )]
    pub inner_blocks: Vec<ResolvedBlock>,

    /// Correlation id for flattened consumption. Unset on nested output.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,

    /// Id of the parent block in flattened output.
    #[serde(
        rename = "parentId",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub parent_id: Option<String>,
}

impl ResolvedBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_inner_blocks(mut self, inner: Vec<ResolvedBlock>) -> Self {
        self.inner_blocks = inner;
        self
    }
}

/// Flatten a resolved block tree into a single list.
///
/// Each block receives a 1-based document-order ordinal as its `id` and the
/// ordinal of its parent as `parent_id`; `inner_blocks` is emptied. Useful
/// for consumers that cannot represent recursive structures.
pub fn flatten_blocks(blocks: &[ResolvedBlock]) -> Vec<ResolvedBlock> {
    let mut flat = Vec::new();
    let mut next_id = 1usize;
    for block in blocks {
        flatten_into(block, None, &mut next_id, &mut flat);
    }
    flat
}

fn flatten_into(
    block: &ResolvedBlock,
    parent_id: Option<&str>,
    next_id: &mut usize,
    flat: &mut Vec<ResolvedBlock>,
) {
    let id = next_id.to_string();
    *next_id += 1;

    let mut entry = block.clone();
    entry.inner_blocks = Vec::new();
    entry.id = Some(id.clone());
    entry.parent_id = parent_id.map(str::to_owned);
    flat.push(entry);

    for child in &block.inner_blocks {
        flatten_into(child, Some(&id), next_id, flat);
    }
}
