//! Ipse — a self-reproducing text generator.
//!
//! A program split into three segments (everything before the
//! self-referential call, the call itself, everything after) whose
//! emission, run again with the same seeds, emits itself byte for byte.

pub mod core;
pub mod schema;
pub mod seed;
