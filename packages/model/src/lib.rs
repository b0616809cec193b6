//! # Blockdata Model
//!
//! Data model for block-structured content and the interfaces the extraction
//! engine consumes from its host.
//!
//! The model splits into three layers:
//!
//! - **Input**: [`RawBlockNode`], the tokenizer's view of a document — a tree
//!   of named blocks, each carrying its inline JSON configuration and raw
//!   HTML fragment.
//! - **Declarations**: [`BlockDefinition`] and [`AttributeSchema`], which
//!   describe how each attribute of a registered block type is sourced from
//!   markup (or bound externally) and how its value is typed.
//! - **Output**: [`ResolvedBlock`], the fully resolved, type-coerced block
//!   tree produced by the engine.
//!
//! The [`external`] module defines the collaborator traits (tokenizer,
//! registries, stores). This crate owns no behavior beyond the types; the
//! engine crate interprets them.

pub mod block;
pub mod external;
pub mod node;
pub mod schema;

pub use block::{flatten_blocks, ResolvedBlock};
pub use external::{
    BindingContext, BindingError, BindingSource, BindingSourceRegistry, ContentStore, DocumentId,
    MetaStore, SchemaRegistry, Tokenizer,
};
pub use node::RawBlockNode;
pub use schema::{AttributeSchema, AttributeSource, BlockDefinition, ValueType};
