//! # CourseMate Core
//!
//! Domain types, traits, and error definitions for the CourseMate course
//! assistant. This crate has **no runtime dependencies** beyond serde,
//! thiserror and tracing. It defines the model every other crate
//! implements against.
//!
//! ## Design Philosophy
//!
//! Every collaborator of the orchestration loop is a trait here:
//! - [`Provider`]: the LLM endpoint
//! - [`Tool`]: a model-callable capability
//! - [`CourseIndex`]: the retrieval backend tools search against
//!
//! Implementations live in their own crates, so tests can swap in scripted
//! providers and in-memory indexes.

pub mod error;
pub mod message;
pub mod provider;
pub mod retrieval;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{ContentBlock, Message, MessageContent, Role, ToolInvocation};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StopReason, ToolDefinition};
pub use retrieval::{CourseIndex, CourseOutline, LessonOutline, SearchHit, SearchQuery, SearchResults};
pub use tool::{Citation, Tool, ToolOutput, ToolRegistry};
