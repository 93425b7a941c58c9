//! Google Gemini client for product image editing.
//!
//! Provides typed request/response messages for the `generateContent`
//! endpoint, a thin HTTP wrapper ([`api::GeminiApi`]), environment-driven
//! configuration, and [`editor::GeminiEditor`], the production
//! implementation of [`prodshot_core::editor::ImageEditor`].

pub mod api;
pub mod config;
pub mod editor;
pub mod messages;

pub use api::{GeminiApi, GeminiApiError};
pub use config::{GeminiConfig, GeminiConfigError};
pub use editor::GeminiEditor;
