//! Shared domain types for the product photo studio.
//!
//! Holds everything the other crates agree on: item identity, accepted
//! media types, the fixed editing instruction, base64 helpers, download
//! naming, and the [`editor::ImageEditor`] contract that remote editing
//! services implement.

pub mod editor;
pub mod encoding;
pub mod error;
pub mod media;
pub mod naming;
pub mod prompt;
pub mod status;
pub mod types;
