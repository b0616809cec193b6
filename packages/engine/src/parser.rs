//! Parse entry point and result envelope.

use crate::context::ParseContext;
use crate::hooks::{BlockFilter, PostParseHook, PreParseHook};
use crate::resolver::Session;
use blockdata_model::{
    BindingSourceRegistry, ContentStore, DocumentId, MetaStore, ResolvedBlock, SchemaRegistry,
    Tokenizer,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Default bound on nested pattern expansion depth.
pub const DEFAULT_MAX_PATTERN_DEPTH: usize = 32;

pub type ParseOutcome = Result<ParseResult, ParseError>;

/// Fatal invocation failures. Everything else surfaces as a warning on the
/// result envelope.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("the 'include' and 'exclude' options cannot be combined")]
    ConflictingOptions,

    #[error("document contains no blocks")]
    NoBlocks,
}

/// Block-name filtering applied across the whole tree. A filtered block is
/// dropped together with its subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Allow-list: when non-empty, only these block names are emitted.
    pub include: Vec<String>,

    /// Deny-list: these block names are dropped. Mutually exclusive with
    /// `include`.
    pub exclude: Vec<String>,
}

impl ParseOptions {
    fn validate(&self) -> Result<(), ParseError> {
        if !self.include.is_empty() && !self.exclude.is_empty() {
            return Err(ParseError::ConflictingOptions);
        }
        Ok(())
    }

    pub(crate) fn allows(&self, block_name: &str) -> bool {
        if !self.include.is_empty() {
            self.include.iter().any(|name| name == block_name)
        } else {
            !self.exclude.iter().any(|name| name == block_name)
        }
    }
}

/// Final envelope of one parse invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub blocks: Vec<ResolvedBlock>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,

    /// Caller-defined keys attached by the post-parse hook; serialized
    /// alongside `blocks` and `warnings`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The engine's entry point. Borrows its collaborators for the duration of
/// the parse; the tokenizer and schema registry are required, everything
/// else is optional.
pub struct ContentParser<'a> {
    pub(crate) tokenizer: &'a dyn Tokenizer,
    pub(crate) schemas: &'a dyn SchemaRegistry,
    pub(crate) binding_sources: Option<&'a dyn BindingSourceRegistry>,
    pub(crate) content: Option<&'a dyn ContentStore>,
    pub(crate) meta: Option<&'a dyn MetaStore>,
    pub(crate) block_filter: Option<&'a dyn BlockFilter>,
    pre_parse: Option<&'a dyn PreParseHook>,
    post_parse: Option<&'a dyn PostParseHook>,
    document_kind: Option<String>,
    pub(crate) max_pattern_depth: usize,
}

impl<'a> ContentParser<'a> {
    pub fn new(tokenizer: &'a dyn Tokenizer, schemas: &'a dyn SchemaRegistry) -> Self {
        Self {
            tokenizer,
            schemas,
            binding_sources: None,
            content: None,
            meta: None,
            block_filter: None,
            pre_parse: None,
            post_parse: None,
            document_kind: None,
            max_pattern_depth: DEFAULT_MAX_PATTERN_DEPTH,
        }
    }

    pub fn with_binding_sources(mut self, registry: &'a dyn BindingSourceRegistry) -> Self {
        self.binding_sources = Some(registry);
        self
    }

    pub fn with_content_store(mut self, store: &'a dyn ContentStore) -> Self {
        self.content = Some(store);
        self
    }

    pub fn with_meta_store(mut self, store: &'a dyn MetaStore) -> Self {
        self.meta = Some(store);
        self
    }

    pub fn with_block_filter(mut self, filter: &'a dyn BlockFilter) -> Self {
        self.block_filter = Some(filter);
        self
    }

    pub fn with_pre_parse(mut self, hook: &'a dyn PreParseHook) -> Self {
        self.pre_parse = Some(hook);
        self
    }

    pub fn with_post_parse(mut self, hook: &'a dyn PostParseHook) -> Self {
        self.post_parse = Some(hook);
        self
    }

    /// Document kind exposed to binding providers under `documentType`.
    pub fn with_document_kind(mut self, kind: impl Into<String>) -> Self {
        self.document_kind = Some(kind.into());
        self
    }

    pub fn with_max_pattern_depth(mut self, depth: usize) -> Self {
        self.max_pattern_depth = depth;
        self
    }

    /// Parse with default options.
    pub fn parse(&self, document_text: &str, document_id: Option<DocumentId>) -> ParseOutcome {
        self.parse_with_options(document_text, document_id, &ParseOptions::default())
    }

    #[instrument(skip(self, document_text, options))]
    pub fn parse_with_options(
        &self,
        document_text: &str,
        document_id: Option<DocumentId>,
        options: &ParseOptions,
    ) -> ParseOutcome {
        options.validate()?;

        let document_text = match self.pre_parse {
            Some(hook) => hook.transform(document_text.to_string()),
            None => document_text.to_string(),
        };

        let nodes = self.tokenizer.tokenize(&document_text);
        if !nodes.iter().any(|node| node.name.is_some()) {
            debug!("document tokenized to no named blocks");
            return Err(ParseError::NoBlocks);
        }

        let mut context = ParseContext::new(document_id);
        if let Some(kind) = &self.document_kind {
            context = context.with_document_kind(kind.clone());
        }

        let mut session = Session::new(self, options);
        let blocks = session.walk(&nodes, &context);
        let warnings = session.into_warnings();

        info!(
            blocks = blocks.len(),
            warnings = warnings.len(),
            "document parse complete"
        );

        let result = ParseResult {
            blocks,
            warnings,
            extra: Map::new(),
        };

        Ok(match self.post_parse {
            Some(hook) => hook.transform(result),
            None => result,
        })
    }
}
