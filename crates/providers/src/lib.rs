//! LLM endpoint implementations for CourseMate.
//!
//! All providers implement the `coursemate_core::Provider` trait.

pub mod anthropic;

pub use anthropic::AnthropicProvider;
