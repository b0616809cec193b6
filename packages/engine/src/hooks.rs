//! Host extension points invoked around and during a parse.
//!
//! Each hook is a single-method trait; plain closures implement them via the
//! blanket impls, so hosts can pass `|name, _| name != "test/hidden"`
//! directly.

use crate::parser::ParseResult;
use blockdata_model::RawBlockNode;

/// Veto inclusion of individual blocks. Returning `false` drops the block
/// and its whole subtree from the output, silently.
pub trait BlockFilter {
    fn allow(&self, block_name: &str, node: &RawBlockNode) -> bool;
}

impl<F> BlockFilter for F
where
    F: Fn(&str, &RawBlockNode) -> bool,
{
    fn allow(&self, block_name: &str, node: &RawBlockNode) -> bool {
        self(block_name, node)
    }
}

/// Rewrite the raw document text once, before tokenization.
pub trait PreParseHook {
    fn transform(&self, document_text: String) -> String;
}

impl<F> PreParseHook for F
where
    F: Fn(String) -> String,
{
    fn transform(&self, document_text: String) -> String {
        self(document_text)
    }
}

/// Rewrite the final result envelope once, after resolution. May attach
/// caller-defined keys through [`ParseResult::extra`].
pub trait PostParseHook {
    fn transform(&self, result: ParseResult) -> ParseResult;
}

impl<F> PostParseHook for F
where
    F: Fn(ParseResult) -> ParseResult,
{
    fn transform(&self, result: ParseResult) -> ParseResult {
        self(result)
    }
}
