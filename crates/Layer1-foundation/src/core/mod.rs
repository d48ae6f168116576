//! Core Module - interfaces shared across layers
//!
//! - `traits.rs`: collaborator contracts implemented here or in higher layers

pub mod traits;

pub use traits::CommandResolver;
