//! Attribute extraction strategies.
//!
//! One [`SourceExtractor`] is created per block, wrapping the block's raw
//! HTML fragment. Each declared attribute's strategy is interpreted against
//! it: DOM-backed strategies lazily parse the fragment once and match CSS
//! selectors inside it; `raw` works on the untouched fragment string; `meta`
//! ignores the fragment entirely and reads the external meta store.
//!
//! `Ok(None)` means the attribute is absent from the markup — the caller
//! decides whether a declared default substitutes. An element that matches
//! but holds an empty value is a real (empty) value, not an absence; the
//! absence test is uniformly "no selector match / no HTML attribute / no
//! meta entry" across all strategies.

use crate::context::ParseContext;
use blockdata_model::{AttributeSchema, AttributeSource, MetaStore, ValueType};
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::{Map, Value};
use std::cell::OnceCell;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Extracts sourced attribute values from one block's fragment.
pub(crate) struct SourceExtractor<'a> {
    raw: &'a str,
    meta: Option<&'a dyn MetaStore>,
    context: &'a ParseContext,
    document: OnceCell<Html>,
}

impl<'a> SourceExtractor<'a> {
    pub fn new(raw: &'a str, meta: Option<&'a dyn MetaStore>, context: &'a ParseContext) -> Self {
        Self {
            raw,
            meta,
            context,
            document: OnceCell::new(),
        }
    }

    /// Extract one attribute against the fragment root.
    pub fn extract(&self, schema: &AttributeSchema) -> Result<Option<Value>, SourceError> {
        let scope = self.document().root_element();
        self.extract_in(schema, scope)
    }

    fn document(&self) -> &Html {
        self.document.get_or_init(|| Html::parse_fragment(self.raw))
    }

    fn extract_in(
        &self,
        schema: &AttributeSchema,
        scope: ElementRef<'_>,
    ) -> Result<Option<Value>, SourceError> {
        let Some(source) = schema.source else {
            return Ok(None);
        };

        let value = match source {
            AttributeSource::Attribute => self
                .first_match(scope, &schema.selector)?
                .zip(schema.attribute.as_deref())
                .and_then(|(el, attr)| el.value().attr(attr))
                .map(|attr| Value::String(attr.to_string())),

            AttributeSource::Html => self
                .first_match(scope, &schema.selector)?
                .map(|el| Value::String(html_value(el, schema.multiline.as_deref()))),

            AttributeSource::Text => self
                .first_match(scope, &schema.selector)?
                .map(|el| Value::String(text_value(el))),

            AttributeSource::RichText => self
                .first_match(scope, &schema.selector)?
                .map(|el| Value::String(el.inner_html())),

            AttributeSource::Query => Some(self.query_value(schema, scope)?),

            AttributeSource::Tag => self
                .first_match(scope, &schema.selector)?
                .map(|el| Value::String(el.value().name().to_ascii_lowercase())),

            AttributeSource::Meta => self.meta_value(schema),

            AttributeSource::Raw => Some(Value::String(self.raw.trim().to_string())),

            AttributeSource::Children => self
                .first_match(scope, &schema.selector)?
                .map(|el| Value::Array(node_children(el))),

            AttributeSource::Node => self
                .first_match(scope, &schema.selector)?
                .map(node_object),
        };

        Ok(value.map(|v| coerce(v, schema.value_type)))
    }

    /// All elements matching `selector` under `scope`; the scope element
    /// itself when no selector is declared.
    fn all_matches<'b>(
        &self,
        scope: ElementRef<'b>,
        selector: &Option<String>,
    ) -> Result<Vec<ElementRef<'b>>, SourceError> {
        match selector {
            Some(selector) => {
                let parsed = parse_selector(selector)?;
                Ok(scope.select(&parsed).collect())
            }
            None => Ok(vec![scope]),
        }
    }

    fn first_match<'b>(
        &self,
        scope: ElementRef<'b>,
        selector: &Option<String>,
    ) -> Result<Option<ElementRef<'b>>, SourceError> {
        Ok(self.all_matches(scope, selector)?.into_iter().next())
    }

    /// One object per selector match, each built from the nested schema.
    fn query_value(
        &self,
        schema: &AttributeSchema,
        scope: ElementRef<'_>,
    ) -> Result<Value, SourceError> {
        let mut items = Vec::new();
        for element in self.all_matches(scope, &schema.selector)? {
            let mut object = Map::new();
            for nested in &schema.query {
                let value = self
                    .extract_in(nested, element)?
                    .or_else(|| nested.default.clone());
                if let Some(value) = value {
                    object.insert(nested.name.clone(), value);
                }
            }
            items.push(Value::Object(object));
        }
        Ok(Value::Array(items))
    }

    fn meta_value(&self, schema: &AttributeSchema) -> Option<Value> {
        let key = schema.meta_key.as_deref()?;
        let document_id = self.context.document_id()?;
        self.meta?.fetch_meta(document_id, key)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, SourceError> {
    Selector::parse(selector).map_err(|e| SourceError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Inner HTML of the match; in multiline mode, the joined outer HTML of the
/// match's child elements of the given tag, with no separator.
fn html_value(element: ElementRef<'_>, multiline: Option<&str>) -> String {
    match multiline {
        Some(tag) => element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name().eq_ignore_ascii_case(tag))
            .map(|child| child.html())
            .collect(),
        None => element.inner_html(),
    }
}

/// Visible text with markup stripped and whitespace collapsed.
fn text_value(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tree-shaped representation used by the deprecated `children`/`node`
/// strategies: text nodes become trimmed strings, elements become
/// `{"type", "children"}` objects. Whitespace-only text is dropped.
fn node_children(element: ElementRef<'_>) -> Vec<Value> {
    let mut children = Vec::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    children.push(Value::String(trimmed.to_string()));
                }
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    children.push(node_object(child));
                }
            }
            _ => {}
        }
    }
    children
}

fn node_object(element: ElementRef<'_>) -> Value {
    let mut object = Map::new();
    object.insert(
        "type".to_string(),
        Value::String(element.value().name().to_ascii_lowercase()),
    );
    object.insert(
        "children".to_string(),
        Value::Array(node_children(element)),
    );
    Value::Object(object)
}

/// String-extracted values of `number`/`boolean` typed attributes are
/// coerced so downstream consumers see primitives, not strings. A boolean
/// follows HTML attribute-presence semantics: any extracted string except
/// the literal `"false"` is true. Unparseable numbers keep the string.
fn coerce(value: Value, value_type: ValueType) -> Value {
    let Value::String(text) = value else {
        return value;
    };

    match value_type {
        ValueType::Number => {
            if let Ok(int) = text.trim().parse::<i64>() {
                Value::from(int)
            } else if let Ok(float) = text.trim().parse::<f64>() {
                Value::from(float)
            } else {
                Value::String(text)
            }
        }
        ValueType::Boolean => Value::Bool(text != "false"),
        _ => Value::String(text),
    }
}
