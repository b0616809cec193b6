//! Block resolution and the recursive tree walk.
//!
//! A [`Session`] lives for one parse invocation: it borrows the parser's
//! collaborators and owns the accumulating warnings list and the in-flight
//! pattern-reference stack. The walk visits nodes in document order,
//! diverting pattern-reference blocks to the expander and isolating per-node
//! failures so one malformed block never aborts its siblings.

use crate::bindings;
use crate::context::ParseContext;
use crate::parser::{ContentParser, ParseOptions};
use crate::patterns;
use crate::sources::{SourceError, SourceExtractor};
use blockdata_model::{DocumentId, RawBlockNode, ResolvedBlock};
use thiserror::Error;
use tracing::{debug, warn};

/// Failure of a single block's resolution. Caught by the walker: the block
/// is dropped with a warning and the walk continues.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("binding source '{source_id}' failed: {error}")]
    Binding {
        source_id: String,
        error: blockdata_model::BindingError,
    },
}

pub(crate) struct Session<'p, 'a> {
    pub(crate) parser: &'p ContentParser<'a>,
    options: &'p ParseOptions,
    pub(crate) warnings: Vec<String>,
    pub(crate) pattern_stack: Vec<DocumentId>,
}

impl<'p, 'a> Session<'p, 'a> {
    pub fn new(parser: &'p ContentParser<'a>, options: &'p ParseOptions) -> Self {
        Self {
            parser,
            options,
            warnings: Vec::new(),
            pattern_stack: Vec::new(),
        }
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    /// Resolve a node list in document order. Gap nodes contribute nothing;
    /// filtered nodes are dropped with their subtree.
    pub fn walk(&mut self, nodes: &[RawBlockNode], context: &ParseContext) -> Vec<ResolvedBlock> {
        let mut resolved = Vec::new();

        for node in nodes {
            let Some(name) = node.name.as_deref() else {
                continue;
            };

            if !self.allowed(name, node) {
                debug!(block = %name, "block filtered from output");
                continue;
            }

            if name == patterns::PATTERN_BLOCK {
                resolved.push(self.expand_pattern(node, context));
                continue;
            }

            match self.resolve_block(node, name, context) {
                Ok(block) => resolved.push(block),
                Err(error) => {
                    warn!(block = %name, %error, "dropping block after resolution failure");
                    self.warnings
                        .push(format!("Error resolving block {name}: {error}"));
                }
            }
        }

        resolved
    }

    fn allowed(&self, name: &str, node: &RawBlockNode) -> bool {
        self.options.allows(name)
            && self
                .parser
                .block_filter
                .map_or(true, |filter| filter.allow(name, node))
    }

    /// Resolve one named block: inline configuration, sourced attributes,
    /// bindings, provided context, then children.
    fn resolve_block(
        &mut self,
        node: &RawBlockNode,
        name: &str,
        context: &ParseContext,
    ) -> Result<ResolvedBlock, ResolveError> {
        let definition = self.parser.schemas.lookup(name);
        let mut attributes = node.attrs.clone();

        match definition {
            Some(definition) => {
                let extractor =
                    SourceExtractor::new(&node.inner_html, self.parser.meta, context);

                for schema in &definition.attributes {
                    if schema.source.is_some() {
                        // Sourced data is authoritative: a successful
                        // extraction (or its default) replaces the inline
                        // value for the same key.
                        let value = extractor
                            .extract(schema)?
                            .or_else(|| schema.default.clone());
                        if let Some(value) = value {
                            attributes.insert(schema.name.clone(), value);
                        }
                    } else if !attributes.contains_key(&schema.name) {
                        if let Some(default) = &schema.default {
                            attributes.insert(schema.name.clone(), default.clone());
                        }
                    }
                }
            }
            None => {
                debug!(block = %name, "block not registered, inline attributes only");
                self.warnings
                    .push(format!("{name} is not registered; sourced attributes unavailable"));
            }
        }

        bindings::resolve_bindings(self, name, &mut attributes, context)?;

        let child_context = match definition {
            Some(definition) if !definition.provides_context.is_empty() => {
                let provided = definition.provides_context.iter().filter_map(|(key, attr)| {
                    attributes.get(attr).map(|value| (key.clone(), value.clone()))
                });
                context.descend_with(provided)
            }
            _ => context.clone(),
        };

        let inner_blocks = self.walk(&node.inner_blocks, &child_context);

        Ok(ResolvedBlock {
            name: name.to_string(),
            attributes,
            inner_blocks,
            id: None,
            parent_id: None,
        })
    }
}
