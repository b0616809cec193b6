//! # Blockdata Engine
//!
//! Resolves tokenized block trees into structured data.
//!
//! ## Purpose
//!
//! Given a raw document string (tokenized by an external collaborator into a
//! tree of named blocks), the engine computes the final value of every
//! attribute each block's registered schema declares: extracted from the
//! block's HTML fragment, taken from inline configuration, substituted from
//! a default, or supplied by an externally registered binding provider. It
//! recursively resolves nested blocks, expands references to shared content
//! patterns, and threads ancestor-provided context down the tree.
//!
//! ## Failure model
//!
//! Resolution is partial by design. A malformed block never aborts the
//! document: the offending block is dropped, a warning naming it is
//! recorded, and its siblings continue. Only malformed invocation
//! parameters (conflicting include/exclude options) and documents with no
//! block markup at all fail the whole call.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockdata_engine::{ContentParser, ParseOptions};
//!
//! let parser = ContentParser::new(&tokenizer, &registry)
//!     .with_binding_sources(&binding_sources)
//!     .with_content_store(&content);
//! let result = parser.parse(document_text, Some(post_id))?;
//! for warning in &result.warnings {
//!     eprintln!("{warning}");
//! }
//! ```

pub mod bindings;
pub mod context;
pub mod hooks;
pub mod parser;
pub mod patterns;
mod resolver;
pub mod sources;


#[cfg(test)]
mod tests_bindings;





pub use bindings::PATTERN_OVERRIDES_SOURCE;
pub use context::ParseContext;
pub use hooks::{BlockFilter, PostParseHook, PreParseHook};
pub use parser::{ContentParser, ParseError, ParseOptions, ParseResult};
pub use patterns::PATTERN_BLOCK;
pub use resolver::ResolveError;
pub use sources::SourceError;
