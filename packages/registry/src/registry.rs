use blockdata_model::{AttributeSchema, BlockDefinition, SchemaRegistry};
use std::collections::HashMap;

/// In-memory schema registry.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    blocks: HashMap<String, BlockDefinition>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block type. A later registration under the same name
    /// replaces the earlier one.
    pub fn register(&mut self, name: impl Into<String>, definition: BlockDefinition) {
        self.blocks.insert(name.into(), definition);
    }

    /// Register a block type from its attribute list alone.
    pub fn register_attributes(
        &mut self,
        name: impl Into<String>,
        attributes: Vec<AttributeSchema>,
    ) {
        self.register(name, BlockDefinition::new(attributes));
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }
}

impl SchemaRegistry for BlockRegistry {
    fn lookup(&self, block_name: &str) -> Option<&BlockDefinition> {
        self.blocks.get(block_name)
    }

    fn list_all(&self) -> Vec<String> {
        self.blocks.keys().cloned().collect()
    }
}
