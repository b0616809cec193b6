//! Externally-bound attribute resolution.
//!
//! A block declares bindings in its inline configuration under
//! `metadata.bindings`, mapping an attribute name to a `{source, args}`
//! descriptor. After sourcing, each declared binding is dispatched to the
//! registered provider for its source id; the provider's value replaces the
//! extracted/inline fallback. Unregistered sources fall back silently.
//!
//! The reserved source `core/pattern-overrides` is built in: it reads the
//! override mapping the pattern expander placed in context and applies the
//! entry matching the block's declared override name. The reserved binding
//! key `__default` applies every attribute of that entry at once.

use crate::context::ParseContext;
use crate::resolver::{ResolveError, Session};
use blockdata_model::BindingContext;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Built-in binding source that resolves pattern override values.
pub const PATTERN_OVERRIDES_SOURCE: &str = "core/pattern-overrides";

/// Context key under which the pattern expander exposes the override
/// mapping to the blocks of the expanded pattern.
pub(crate) const PATTERN_OVERRIDES_CONTEXT: &str = "pattern/overrides";

/// Binding key meaning "every attribute of the matching override entry".
const DEFAULT_BINDING_KEY: &str = "__default";

/// Ambient context keys providers may declare in `uses_context`.
const DOCUMENT_ID_KEY: &str = "documentId";
const DOCUMENT_KIND_KEY: &str = "documentType";

pub(crate) fn resolve_bindings(
    session: &Session<'_, '_>,
    block_name: &str,
    attributes: &mut Map<String, Value>,
    context: &ParseContext,
) -> Result<(), ResolveError> {
    let declared = declared_bindings(attributes);
    if declared.is_empty() {
        return Ok(());
    }

    for (attribute, source_id, args) in declared {
        if source_id == PATTERN_OVERRIDES_SOURCE {
            apply_pattern_overrides(&attribute, attributes, context);
            continue;
        }

        let Some(registry) = session.parser.binding_sources else {
            continue;
        };
        let Some(provider) = registry.lookup(&source_id) else {
            debug!(source = %source_id, "binding source not registered, keeping fallback");
            continue;
        };

        let provider_context = binding_context(provider.uses_context(), context);
        match provider.value(&args, block_name, &provider_context) {
            Ok(Some(value)) => {
                attributes.insert(attribute, value);
            }
            Ok(None) => {}
            Err(error) => {
                return Err(ResolveError::Binding {
                    source_id,
                    error,
                })
            }
        }
    }

    Ok(())
}

/// Declared bindings in declaration order: (attribute, source id, args).
fn declared_bindings(attributes: &Map<String, Value>) -> Vec<(String, String, Map<String, Value>)> {
    let Some(bindings) = attributes
        .get("metadata")
        .and_then(|metadata| metadata.get("bindings"))
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };

    bindings
        .iter()
        .filter_map(|(attribute, descriptor)| {
            let source = descriptor.get("source")?.as_str()?.to_string();
            let args = descriptor
                .get("args")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            Some((attribute.clone(), source, args))
        })
        .collect()
}

/// Replace bound attributes with the override entry matching this block's
/// declared override name, if the expansion context carries one.
fn apply_pattern_overrides(
    attribute: &str,
    attributes: &mut Map<String, Value>,
    context: &ParseContext,
) {
    let Some(override_name) = attributes
        .get("metadata")
        .and_then(|metadata| metadata.get("name"))
        .and_then(Value::as_str)
        .map(str::to_owned)
    else {
        return;
    };

    let Some(entry) = context
        .value(PATTERN_OVERRIDES_CONTEXT)
        .and_then(|overrides| overrides.get(&override_name))
        .and_then(Value::as_object)
        .cloned()
    else {
        return;
    };

    if attribute == DEFAULT_BINDING_KEY {
        for (key, value) in entry {
            attributes.insert(key, value);
        }
    } else if let Some(value) = entry.get(attribute) {
        attributes.insert(attribute.to_string(), value.clone());
    }
}

/// Build the provider-facing context: ancestor-provided values filtered to
/// the declared `uses_context` keys, with the ambient document identity
/// resolving the reserved `documentId`/`documentType` keys.
fn binding_context(uses_context: &[String], context: &ParseContext) -> BindingContext {
    let mut values = HashMap::new();

    for key in uses_context {
        let value = match key.as_str() {
            DOCUMENT_ID_KEY => context.document_id().map(Value::from),
            DOCUMENT_KIND_KEY => context
                .document_kind()
                .map(|kind| Value::String(kind.to_string())),
            _ => context.value(key).cloned(),
        };
        if let Some(value) = value {
            values.insert(key.clone(), value);
        }
    }

    BindingContext::new(values)
}
