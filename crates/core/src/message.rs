//! Message and content-block domain types.
//!
//! A conversation with the LLM endpoint is an append-only `Vec<Message>`:
//! the user query, then alternating assistant turns (possibly carrying
//! tool invocations) and user turns (carrying the batched tool results).
//!
//! The serde shapes match the Anthropic Messages wire format, so providers
//! can serialize these types directly.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user, or the loop reporting tool results
    User,
    /// The model
    Assistant,
}

/// One block of structured message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text { text: String },

    /// A tool invocation requested by the model.
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },

    /// The outcome of one tool invocation, correlated by `tool_use_id`.
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "is_false")]
        is_error: bool,
    },
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ContentBlock {
    /// Create a text block.
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Create a tool-use block.
    pub fn tool_use(
        id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
    ) -> Self {
        ContentBlock::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    /// Create a tool-result block.
    pub fn tool_result(
        tool_use_id: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) -> Self {
        ContentBlock::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error,
        }
    }

    /// The text of a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::ToolUse { .. } | ContentBlock::ToolResult { .. } => None,
        }
    }

    /// View a `ToolUse` block as an invocation request.
    pub fn as_invocation(&self) -> Option<ToolInvocation<'_>> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some(ToolInvocation { id, name, input }),
            ContentBlock::Text { .. } | ContentBlock::ToolResult { .. } => None,
        }
    }
}

/// A borrowed view of a tool invocation inside an assistant turn.
#[derive(Debug, Clone, Copy)]
pub struct ToolInvocation<'a> {
    /// Opaque identifier assigned by the endpoint
    pub id: &'a str,
    /// Name of the tool to dispatch to
    pub name: &'a str,
    /// Structured arguments
    pub input: &'a serde_json::Value,
}

/// Message payload: either a bare string or a list of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this turn
    pub role: Role,

    /// The payload
    pub content: MessageContent,
}

impl Message {
    /// Create a plain-text user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create an assistant message from raw response blocks.
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Create the user turn that batches one round of tool results.
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(results),
        }
    }

    /// Structured blocks of this message (empty for plain text).
    pub fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            MessageContent::Text(_) => &[],
            MessageContent::Blocks(blocks) => blocks,
        }
    }

    /// Tool invocations carried by this message, in order.
    pub fn tool_uses(&self) -> impl Iterator<Item = ToolInvocation<'_>> {
        self.blocks().iter().filter_map(ContentBlock::as_invocation)
    }

    /// The first text in this message, whether plain or block-based.
    pub fn first_text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Blocks(blocks) => blocks.iter().find_map(ContentBlock::as_text),
        }
    }
}
