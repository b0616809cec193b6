//! # Blockdata Registry
//!
//! In-memory implementations of the collaborator interfaces declared in
//! `blockdata-model`: a block registry, a binding-source registry with
//! closure-backed providers, and content/meta stores. Hosts with real
//! persistence implement the traits directly; these implementations serve
//! embedded use and the engine's test suite.

pub mod bindings;
pub mod registry;
pub mod store;

pub use bindings::{BindingSources, CallbackSource};
pub use registry::BlockRegistry;
pub use store::{InMemoryContent, InMemoryMeta};
