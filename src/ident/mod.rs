//! Identifier handling for content nodes
//!
//! Node identifiers are derived from human-readable page text and must be
//! stable across runs so downstream systems can match nodes between crawls.

mod normalize;
mod registry;

pub use normalize::{is_valid_identifier, normalize};
pub use registry::{CollisionPolicy, IdRegistry};
