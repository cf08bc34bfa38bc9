//! In-memory resource graph
//!
//! The graph is a mutable snapshot of every organization resource and its
//! cross-references. It is loaded once, mutated in place by successive
//! cleaner passes, and serialized once at the end of a run. Single-writer
//! discipline is assumed throughout: nothing here is safe for concurrent
//! mutation.

pub mod errors;
pub mod operations;
pub mod persistence;
pub mod types;

pub use errors::GraphError;
pub use operations::ResourceKind;
pub use persistence::{load_snapshot, save_snapshot};
pub use types::{
    App, Developer, Environment, FlowHook, Proxy, ResourceGraph, RevisionDeployment, SharedFlow,
};
