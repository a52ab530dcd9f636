//! The tool-augmented answering loop.

use std::sync::Arc;
use coursemate_core::message::{ContentBlock, Message, ToolInvocation};
use coursemate_core::provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition};
use coursemate_core::tool::ToolRegistry;
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Default cap on tool rounds per query.
pub const MAX_TOOL_ROUNDS: u32 = 2;

/// Static system instructions for the course assistant.
pub const SYSTEM_PROMPT: &str = "\
You are an AI assistant specialized in course materials and educational content, with access to tools for course information.

Multi-step tool usage:
- You may use tools up to 2 times per query when a question needs more than one lookup
- After receiving tool results you may call another tool if the first results are insufficient
- Chain tools to search broadly then narrow down, to fetch an outline then search specific content, or to compare courses

Search tool:
- Use it for questions about specific course content or detailed educational material
- Refine the search terms if the first results are insufficient
- Synthesize results into accurate, fact-based answers
- If the search finds nothing, say so plainly without offering alternatives

Course outline tool:
- Use it for questions about course structure, lesson lists, or what a course covers
- It returns the course title, course link, and every lesson with its number, title and link
- Always include the course title, course link and all lesson information in your answer

Response protocol:
- General knowledge questions: answer from your own knowledge without searching
- Course-specific questions: search first, then answer
- Course structure questions: use the outline tool, then present the full course information
- No meta-commentary: give the direct answer only, never describe your search process or mention tool results

All responses must be brief, educational, clear, and supported by examples when they help.
Provide only the direct answer to what was asked.";

/// Drives one query through the LLM endpoint, executing requested tools
/// for a bounded number of rounds.
pub struct AgentLoop {
    /// The LLM endpoint
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Max output tokens per response
    max_tokens: u32,

    /// Maximum tool rounds per query
    max_rounds: u32,

    /// Static system instructions
    system_prompt: String,
}

impl AgentLoop {
    /// Create a loop with deterministic sampling and the default round cap.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: 800,
            max_rounds: MAX_TOOL_ROUNDS,
            system_prompt: SYSTEM_PROMPT.into(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Set the maximum number of tool rounds (at least 1).
    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max.max(1);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Answer a query, optionally with tools.
    ///
    /// Tools are offered only when both `tools` (non-empty) and `registry`
    /// are given. Once the round budget is spent, or any invocation in a
    /// round failed, the next request carries no tool definitions so the
    /// model has to answer in text. Endpoint faults end the query.
    pub async fn answer(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&[ToolDefinition]>,
        registry: Option<&ToolRegistry>,
    ) -> coursemate_core::Result<String> {
        let system = match history {
            Some(history) if !history.is_empty() => {
                format!("{}\n\nPrevious conversation:\n{history}", self.system_prompt)
            }
            _ => self.system_prompt.clone(),
        };

        let toolset = match (tools, registry) {
            (Some(defs), Some(registry)) if !defs.is_empty() => Some((defs, registry)),
            _ => None,
        };

        info!(
            model = %self.model,
            tools = toolset.map_or(0, |(defs, _)| defs.len()),
            has_history = history.is_some_and(|h| !h.is_empty()),
            "Answering query"
        );

        let mut messages = vec![Message::user(query)];
        let mut offered = toolset;
        let mut round = 0u32;
        let mut response = self.request(&system, &messages, offered).await?;

        while let Some((defs, registry)) = offered {
            if !response.wants_tools() {
                break;
            }
            if response.tool_uses().next().is_none() {
                warn!("Endpoint asked for tools without naming any, treating as final");
                break;
            }

            round += 1;
            let (results, faulted) = Self::run_round(registry, &response, round).await;

            messages.push(Message::assistant_blocks(response.content));
            messages.push(Message::tool_results(results));

            offered = if round < self.max_rounds && !faulted {
                Some((defs, registry))
            } else {
                debug!(round, faulted, "Withholding tools from the next request");
                None
            };
            response = self.request(&system, &messages, offered).await?;
        }

        if response.wants_tools() && toolset.is_some() {
            debug!(rounds = round, "Tool request ignored after the round budget closed");
        }

        let answer = response.first_text().unwrap_or_default().to_string();
        info!(rounds = round, messages = messages.len(), "Query answered");
        Ok(answer)
    }

    async fn request(
        &self,
        system: &str,
        messages: &[Message],
        offered: Option<(&[ToolDefinition], &ToolRegistry)>,
    ) -> coursemate_core::Result<ProviderResponse> {
        let request = ProviderRequest {
            model: self.model.clone(),
            system: Some(system.to_string()),
            messages: messages.to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: offered.map(|(defs, _)| defs.to_vec()).unwrap_or_default(),
        };

        debug!(
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Calling endpoint"
        );
        Ok(self.provider.complete(request).await?)
    }

    /// Execute one round's invocations concurrently.
    ///
    /// Results come back in request order, and citation batches are recorded
    /// in that order too, so the last requested invocation of a tool wins.
    /// The flag reports whether any invocation failed for a reason other than
    /// an unknown tool name.
    async fn run_round(
        registry: &ToolRegistry,
        response: &ProviderResponse,
        round: u32,
    ) -> (Vec<ContentBlock>, bool) {
        let invocations: Vec<ToolInvocation<'_>> = response.tool_uses().collect();
        debug!(round, count = invocations.len(), "Executing tool round");

        let outcomes = join_all(
            invocations
                .iter()
                .map(|inv| registry.execute(inv.name, inv.input.clone())),
        )
        .await;

        let mut faulted = false;
        let mut results = Vec::with_capacity(invocations.len());
        for (inv, outcome) in invocations.iter().zip(outcomes) {
            let block = match outcome {
                Ok(output) => {
                    debug!(tool = inv.name, id = inv.id, "Tool invocation succeeded");
                    registry.record_citations(inv.name, output.citations);
                    ContentBlock::tool_result(inv.id, output.text, false)
                }
                Err(e) if e.is_not_found() => {
                    warn!(tool = inv.name, "Model asked for an unknown tool");
                    ContentBlock::tool_result(inv.id, e.to_string(), true)
                }
                Err(e) => {
                    warn!(tool = inv.name, error = %e, "Tool execution failed");
                    faulted = true;
                    ContentBlock::tool_result(inv.id, format!("Error executing tool: {e}"), true)
                }
            };
            results.push(block);
        }

        (results, faulted)
    }
}
