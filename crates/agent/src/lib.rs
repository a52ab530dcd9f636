//! The answering core of CourseMate.
//!
//! A query flows through three layers:
//!
//! 1. [`CourseAssistant`] picks the session, renders its history and
//!    collects citations once the answer is in
//! 2. [`AgentLoop`] sends the query to the LLM endpoint and, when the model
//!    asks for tools, executes them through the registry and feeds the
//!    results back, for at most [`MAX_TOOL_ROUNDS`] rounds by default
//! 3. [`SessionStore`] keeps the last few exchanges per session
//!
//! The loop ends when the model answers in text, or when tools are
//! withheld and it has to.

pub mod assistant;
pub mod loop_runner;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use assistant::{CourseAnalytics, CourseAssistant, QueryResponse};
pub use loop_runner::{AgentLoop, MAX_TOOL_ROUNDS, SYSTEM_PROMPT};
pub use session::{Exchange, SessionStore};
