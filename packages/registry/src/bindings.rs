use blockdata_model::{BindingContext, BindingError, BindingSource, BindingSourceRegistry};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A binding provider backed by a closure, mirroring host registration of
/// the form "source id + value callback + used context keys".
pub struct CallbackSource<F> {
    uses_context: Vec<String>,
    callback: F,
}

impl<F> CallbackSource<F>
where
    F: Fn(&Map<String, Value>, &str, &BindingContext) -> Option<Value>,
{
    pub fn new(callback: F) -> Self {
        Self {
            uses_context: Vec::new(),
            callback,
        }
    }

    pub fn with_context_keys(mut self, keys: Vec<String>) -> Self {
        self.uses_context = keys;
        self
    }
}

impl<F> BindingSource for CallbackSource<F>
where
    F: Fn(&Map<String, Value>, &str, &BindingContext) -> Option<Value>,
{
    fn uses_context(&self) -> &[String] {
        &self.uses_context
    }

    fn value(
        &self,
        args: &Map<String, Value>,
        block_name: &str,
        context: &BindingContext,
    ) -> Result<Option<Value>, BindingError> {
        Ok((self.callback)(args, block_name, context))
    }
}

/// In-memory binding-source registry.
#[derive(Default)]
pub struct BindingSources {
    sources: HashMap<String, Box<dyn BindingSource>>,
}

impl BindingSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source_id: impl Into<String>, source: Box<dyn BindingSource>) {
        self.sources.insert(source_id.into(), source);
    }

    /// Register a closure-backed provider with no context needs.
    pub fn register_callback<F>(&mut self, source_id: impl Into<String>, callback: F)
    where
        F: Fn(&Map<String, Value>, &str, &BindingContext) -> Option<Value> + 'static,
    {
        self.register(source_id, Box::new(CallbackSource::new(callback)));
    }
}

impl BindingSourceRegistry for BindingSources {
    fn lookup(&self, source_id: &str) -> Option<&dyn BindingSource> {
        self.sources.get(source_id).map(Box::as_ref)
    }
}
