//! Tool trait: the abstraction over model-callable capabilities.
//!
//! Tools are how the assistant reaches course material: searching lesson
//! content, looking up a course outline. Each execution may also produce
//! citations, which the [`ToolRegistry`] retains until the caller drains
//! and resets them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};
use crate::error::ToolError;
use crate::provider::ToolDefinition;

/// Attribution of an answer fragment to retrieved source material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Display text, e.g. "Intro to MCP - Lesson 2"
    pub text: String,

    /// Link to the source, when one is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Citation {
    pub fn new(text: impl Into<String>, url: Option<String>) -> Self {
        Self {
            text: text.into(),
            url,
        }
    }
}

/// What a tool execution hands back: model-readable text plus citations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    /// The text returned to the model
    pub text: String,

    /// Citations produced by this execution (may be empty)
    pub citations: Vec<Citation>,
}

impl ToolOutput {
    /// Output with no citations.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: Vec::new(),
        }
    }

    /// Output with citations.
    pub fn with_citations(text: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            text: text.into(),
            citations,
        }
    }
}

/// The core Tool trait.
///
/// Implementations must report "nothing matched" as a normal `Ok` output;
/// `Err` is reserved for genuine failures such as an unavailable backend.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "search_course_content").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, input: serde_json::Value) -> std::result::Result<ToolOutput, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// A registry of available tools.
///
/// The orchestration loop uses this to:
/// 1. Get tool definitions to send to the LLM (registration order)
/// 2. Dispatch tool invocations by name
///
/// The caller uses it afterwards to read and clear citations. Citation
/// state lives here, one batch per registered tool, so a registry must
/// serve one query at a time.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    by_name: HashMap<String, usize>,
    citations: Mutex<Vec<Vec<Citation>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
            citations: Mutex::new(Vec::new()),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name,
    /// keeping its position in the menu.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        let citations = self
            .citations
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);

        match self.by_name.get(&name).copied() {
            Some(slot) => {
                warn!(tool = %name, "Tool registered twice, replacing the earlier registration");
                self.tools[slot] = tool;
                citations[slot].clear();
            }
            None => {
                self.by_name.insert(name, self.tools.len());
                self.tools.push(tool);
                citations.push(Vec::new());
            }
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.by_name.get(name).map(|&slot| self.tools[slot].as_ref())
    }

    /// Get all tool definitions, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// Dispatch an invocation to the named tool.
    ///
    /// An unknown name yields `ToolError::NotFound`, whose message reads
    /// "Tool '<name>' not found". On success the tool's retained citations
    /// are overwritten with this execution's batch.
    pub async fn dispatch(
        &self,
        name: &str,
        input: serde_json::Value,
    ) -> std::result::Result<String, ToolError> {
        let output = self.execute(name, input).await?;
        self.record_citations(name, output.citations);
        Ok(output.text)
    }

    /// Run the named tool without touching retained citations.
    ///
    /// Callers executing several invocations concurrently use this and then
    /// record each batch with [`record_citations`](Self::record_citations)
    /// in request order.
    pub async fn execute(
        &self,
        name: &str,
        input: serde_json::Value,
    ) -> std::result::Result<ToolOutput, ToolError> {
        let Some(&slot) = self.by_name.get(name) else {
            return Err(ToolError::NotFound(name.to_string()));
        };

        let output = self.tools[slot].execute(input).await?;
        debug!(tool = name, citations = output.citations.len(), "Tool executed");
        Ok(output)
    }

    /// Replace the named tool's retained citations. Unknown names are ignored.
    pub fn record_citations(&self, name: &str, citations: Vec<Citation>) {
        if let Some(&slot) = self.by_name.get(name) {
            self.lock_citations()[slot] = citations;
        }
    }

    /// Every tool's latest citation batch, concatenated in registration order.
    pub fn drain_citations(&self) -> Vec<Citation> {
        self.lock_citations().iter().flatten().cloned().collect()
    }

    /// Clear every tool's retained citations.
    pub fn reset_citations(&self) {
        self.lock_citations().iter_mut().for_each(Vec::clear);
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn lock_citations(&self) -> MutexGuard<'_, Vec<Vec<Citation>>> {
        self.citations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
