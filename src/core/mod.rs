pub mod escape;
pub mod invocation;
pub mod replicator;
pub mod template;
