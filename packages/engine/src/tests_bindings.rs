//! Externally-bound attribute tests: provider dispatch, context filtering,
//! fallback behavior, failure isolation.

use crate::parser::{ContentParser, ParseResult};
use crate::testing::{blocks_json, DelimiterTokenizer};
use blockdata_model::{
    AttributeSchema, AttributeSource, BindingContext, BindingError, BindingSource,
    BlockDefinition, ValueType,
};
use blockdata_registry::{BindingSources, BlockRegistry, CallbackSource};
use serde_json::{json, Map, Value};

fn paragraph_registry() -> BlockRegistry {
    let mut registry = BlockRegistry::new();
    registry.register_attributes(
        "core/paragraph",
        vec![AttributeSchema::new("content", ValueType::RichText)
            .sourced(AttributeSource::RichText)
            .with_selector("p")],
    );
    registry
}

fn parse(registry: &BlockRegistry, sources: &BindingSources, html: &str) -> ParseResult {
    ContentParser::new(&DelimiterTokenizer, registry)
        .with_binding_sources(sources)
        .parse(html, None)
        .unwrap()
}

#[test]
fn bound_value_overrides_extracted_value() {
    let registry = paragraph_registry();

    let mut sources = BindingSources::new();
    sources.register_callback("test/greeting", |_args, _block, _context| {
        Some(json!("Bound content"))
    });

    let result = parse(
        &registry,
        &sources,
        r#"
        <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/greeting"}}}} -->
        <p>Extracted content</p>
        <!-- /wp:paragraph -->
        "#,
    );

    assert_eq!(
        blocks_json(&result),
        json!([{
            "name": "core/paragraph",
            "attributes": {
                "metadata": { "bindings": { "content": { "source": "test/greeting" } } },
                "content": "Bound content",
            },
        }])
    );
    assert!(result.warnings.is_empty());
}

#[test]
fn provider_receives_args_and_block_name() {
    let registry = paragraph_registry();

    let mut sources = BindingSources::new();
    sources.register_callback("test/echo", |args, block_name, _context| {
        Some(json!(format!("{}:{}", block_name, args["key"].as_str()?)))
    });

    let result = parse(
        &registry,
        &sources,
        r#"
        <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/echo","args":{"key":"value"}}}}} -->
        <p>Fallback</p>
        <!-- /wp:paragraph -->
        "#,
    );

    assert_eq!(
        result.blocks[0].attributes["content"],
        json!("core/paragraph:value")
    );
}

#[test]
fn unregistered_source_keeps_fallback_silently() {
    let registry = paragraph_registry();
    let sources = BindingSources::new();

    let result = parse(
        &registry,
        &sources,
        r#"
        <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/not-registered"}}}} -->
        <p>Extracted content</p>
        <!-- /wp:paragraph -->
        "#,
    );

    assert_eq!(
        result.blocks[0].attributes["content"],
        json!("Extracted content")
    );
    assert!(result.warnings.is_empty());
}

#[test]
fn bindings_without_a_source_registry_keep_fallback() {
    let registry = paragraph_registry();

    let result = ContentParser::new(&DelimiterTokenizer, &registry)
        .parse(
            r#"
            <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/greeting"}}}} -->
            <p>Extracted content</p>
            <!-- /wp:paragraph -->
            "#,
            None,
        )
        .unwrap();

    assert_eq!(
        result.blocks[0].attributes["content"],
        json!("Extracted content")
    );
    assert!(result.warnings.is_empty());
}

#[test]
fn provider_returning_nothing_keeps_fallback() {
    let registry = paragraph_registry();

    let mut sources = BindingSources::new();
    sources.register_callback("test/empty", |_args, _block, _context| None);

    let result = parse(
        &registry,
        &sources,
        r#"
        <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/empty"}}}} -->
        <p>Extracted content</p>
        <!-- /wp:paragraph -->
        "#,
    );

    assert_eq!(
        result.blocks[0].attributes["content"],
        json!("Extracted content")
    );
}

#[test]
fn falsy_provider_value_still_overrides() {
    let registry = paragraph_registry();

    let mut sources = BindingSources::new();
    sources.register_callback("test/blank", |_args, _block, _context| Some(json!("")));

    let result = parse(
        &registry,
        &sources,
        r#"
        <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/blank"}}}} -->
        <p>Extracted content</p>
        <!-- /wp:paragraph -->
        "#,
    );

    assert_eq!(result.blocks[0].attributes["content"], json!(""));
}

#[test]
fn undeclared_context_keys_are_not_visible() {
    let mut registry = paragraph_registry();
    registry.register(
        "test/record",
        BlockDefinition::new(vec![AttributeSchema::new("recordId", ValueType::Number)])
            .providing_context("test/recordId", "recordId"),
    );

    let mut sources = BindingSources::new();
    sources.register_callback("test/record-title", |_args, _block, context| {
        // No uses_context declaration: the ancestor-provided key must
        // not leak through.
        assert!(context.get("test/recordId").is_none());
        assert!(context.is_empty());
        Some(json!("no context"))
    });

    let result = parse(
        &registry,
        &sources,
        r#"
        <!-- wp:test/record {"recordId":7} -->
        <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/record-title"}}}} -->
        <p>Fallback</p>
        <!-- /wp:paragraph -->
        <!-- /wp:test/record -->
        "#,
    );

    let paragraph = &result.blocks[0].inner_blocks[0];
    assert_eq!(paragraph.attributes["content"], json!("no context"));
}

#[test]
fn ancestor_provided_context_reaches_declared_consumer() {
    let mut registry = paragraph_registry();
    registry.register(
        "test/record",
        BlockDefinition::new(vec![AttributeSchema::new("recordId", ValueType::Number)])
            .providing_context("test/recordId", "recordId"),
    );

    let mut sources = BindingSources::new();
    sources.register(
        "test/record-title",
        Box::new(
            CallbackSource::new(|_args, _block, context| {
                let id = context.get("test/recordId")?.as_i64()?;
                Some(json!(format!("Record {id}")))
            })
            .with_context_keys(vec!["test/recordId".to_string()]),
        ),
    );

    let result = parse(
        &registry,
        &sources,
        r#"
        <!-- wp:test/record {"recordId":7} -->
        <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/record-title"}}}} -->
        <p>Fallback</p>
        <!-- /wp:paragraph -->
        <!-- /wp:test/record -->
        "#,
    );

    let paragraph = &result.blocks[0].inner_blocks[0];
    assert_eq!(paragraph.attributes["content"], json!("Record 7"));
}

#[test]
fn sibling_subtrees_do_not_share_context() {
    let mut registry = paragraph_registry();
    registry.register(
        "test/record",
        BlockDefinition::new(vec![AttributeSchema::new("recordId", ValueType::Number)])
            .providing_context("test/recordId", "recordId"),
    );

    let mut sources = BindingSources::new();
    sources.register(
        "test/record-title",
        Box::new(
            CallbackSource::new(|_args, _block, context| {
                Some(match context.get("test/recordId") {
                    Some(id) => json!(format!("Record {id}")),
                    None => json!("No record"),
                })
            })
            .with_context_keys(vec!["test/recordId".to_string()]),
        ),
    );

    let result = parse(
        &registry,
        &sources,
        r#"
        <!-- wp:test/record {"recordId":7} -->
        <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/record-title"}}}} -->
        <p>Inside</p>
        <!-- /wp:paragraph -->
        <!-- /wp:test/record -->

        <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/record-title"}}}} -->
        <p>Outside</p>
        <!-- /wp:paragraph -->
        "#,
    );

    let inside = &result.blocks[0].inner_blocks[0];
    let outside = &result.blocks[1];
    assert_eq!(inside.attributes["content"], json!("Record 7"));
    assert_eq!(outside.attributes["content"], json!("No record"));
}

#[test]
fn ambient_document_identity_resolves_reserved_keys() {
    let registry = paragraph_registry();

    let mut sources = BindingSources::new();
    sources.register(
        "test/identity",
        Box::new(
            CallbackSource::new(|_args, _block, context| {
                Some(json!(format!(
                    "{}/{}",
                    context.get("documentId")?,
                    context.get("documentType")?.as_str()?
                )))
            })
            .with_context_keys(vec!["documentId".to_string(), "documentType".to_string()]),
        ),
    );

    let result = ContentParser::new(&DelimiterTokenizer, &registry)
        .with_binding_sources(&sources)
        .with_document_kind("article")
        .parse(
            r#"
            <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/identity"}}}} -->
            <p>Fallback</p>
            <!-- /wp:paragraph -->
            "#,
            Some(99),
        )
        .unwrap();

    assert_eq!(result.blocks[0].attributes["content"], json!("99/article"));
}

struct FailingSource;

impl BindingSource for FailingSource {
    fn value(
        &self,
        _args: &Map<String, Value>,
        _block_name: &str,
        _context: &BindingContext,
    ) -> Result<Option<Value>, BindingError> {
        Err(BindingError::new("backing service unavailable"))
    }
}

#[test]
fn failing_provider_drops_block_but_not_siblings() {
    let registry = paragraph_registry();

    let mut sources = BindingSources::new();
    sources.register("test/failing", Box::new(FailingSource));

    let result = parse(
        &registry,
        &sources,
        r#"
        <!-- wp:paragraph {"metadata":{"bindings":{"content":{"source":"test/failing"}}}} -->
        <p>Doomed</p>
        <!-- /wp:paragraph -->

        <!-- wp:paragraph -->
        <p>Sibling survives</p>
        <!-- /wp:paragraph -->
        "#,
    );

    assert_eq!(
        blocks_json(&result),
        json!([{
            "name": "core/paragraph",
            "attributes": { "content": "Sibling survives" },
        }])
    );
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("core/paragraph"));
    assert!(result.warnings[0].contains("backing service unavailable"));
}

#[test]
fn binding_applies_to_unregistered_blocks_too() {
    let registry = BlockRegistry::new();

    let mut sources = BindingSources::new();
    sources.register_callback("test/greeting", |_args, _block, _context| {
        Some(json!("Bound content"))
    });

    let result = parse(
        &registry,
        &sources,
        r#"
        <!-- wp:test/unknown {"metadata":{"bindings":{"content":{"source":"test/greeting"}}}} -->
        <p>Inline only</p>
        <!-- /wp:test/unknown -->
        "#,
    );

    assert_eq!(result.blocks[0].attributes["content"], json!("Bound content"));
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("not registered"));
}
