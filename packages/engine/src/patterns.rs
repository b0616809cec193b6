//! Pattern-reference expansion.
//!
//! A pattern reference is a block named `core/block` whose `ref` attribute
//! identifies another stored document. Expansion fetches that document from
//! the content store, tokenizes it, and walks the result with the same
//! session — so ambient identity stays that of the *original* document, and
//! warnings accumulate in one place. The expanded roots become the reference
//! block's `inner_blocks`; the reference itself remains as a thin wrapper
//! carrying `ref`.
//!
//! Patterns nest to unbounded depth, so expansion is guarded twice: an
//! in-flight ref stack catches self- and mutually-referencing patterns, and
//! a depth cap bounds pathological chains. Both degrade to a warning and an
//! empty expansion.

use crate::bindings::PATTERN_OVERRIDES_CONTEXT;
use crate::context::ParseContext;
use crate::resolver::Session;
use blockdata_model::{DocumentId, RawBlockNode, ResolvedBlock};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Block name of a pattern reference.
pub const PATTERN_BLOCK: &str = "core/block";

const REF_ATTR: &str = "ref";

/// Inline attribute of the reference block carrying the override mapping
/// (override name -> attribute values). Consumed by expansion, never
/// re-emitted on the wrapper.
const OVERRIDES_ATTR: &str = "content";

impl Session<'_, '_> {
    pub(crate) fn expand_pattern(
        &mut self,
        node: &RawBlockNode,
        context: &ParseContext,
    ) -> ResolvedBlock {
        let mut attributes = node.attrs.clone();
        let overrides = attributes.shift_remove(OVERRIDES_ATTR);

        let inner_blocks = match attributes.get(REF_ATTR).and_then(Value::as_i64) {
            Some(ref_id) => self.expand_reference(ref_id, overrides, context),
            None => {
                self.warnings.push(format!(
                    "{PATTERN_BLOCK} is missing a valid \"{REF_ATTR}\" attribute"
                ));
                Vec::new()
            }
        };

        ResolvedBlock {
            name: PATTERN_BLOCK.to_string(),
            attributes,
            inner_blocks,
            id: None,
            parent_id: None,
        }
    }

    fn expand_reference(
        &mut self,
        ref_id: DocumentId,
        overrides: Option<Value>,
        context: &ParseContext,
    ) -> Vec<ResolvedBlock> {
        if self.pattern_stack.contains(&ref_id) {
            warn!(ref_id, "cyclic pattern reference");
            self.warnings.push(format!(
                "Pattern document {ref_id} is already being expanded; cyclic reference skipped"
            ));
            return Vec::new();
        }

        if self.pattern_stack.len() >= self.parser.max_pattern_depth {
            warn!(ref_id, depth = self.pattern_stack.len(), "pattern nesting too deep");
            self.warnings.push(format!(
                "Pattern document {ref_id} exceeds the maximum expansion depth"
            ));
            return Vec::new();
        }

        let content = self
            .parser
            .content
            .and_then(|store| store.fetch_content(ref_id));
        let Some(content) = content else {
            self.warnings
                .push(format!("Pattern document {ref_id} could not be found"));
            return Vec::new();
        };

        debug!(ref_id, "expanding pattern reference");
        let nodes = self.parser.tokenizer.tokenize(&content);

        // Override visibility is scoped to this expansion: a nested pattern
        // replaces the mapping with its own (possibly empty) one.
        let child_context = context.descend_with([(
            PATTERN_OVERRIDES_CONTEXT.to_string(),
            overrides.unwrap_or_else(|| Value::Object(Map::new())),
        )]);

        self.pattern_stack.push(ref_id);
        let blocks = self.walk(&nodes, &child_context);
        self.pattern_stack.pop();
        blocks
    }
}
