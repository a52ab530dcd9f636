//! Shared test helpers: a scripted endpoint that records every request.

use coursemate_core::error::ProviderError;
use coursemate_core::message::ContentBlock;
use coursemate_core::provider::{Provider, ProviderRequest, ProviderResponse, StopReason, Usage};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted outcomes.
///
/// Each call to `complete` records the request and returns the next
/// outcome in the queue. Panics if more calls are made than outcomes
/// provided.
pub struct ScriptedProvider {
    outcomes: Mutex<VecDeque<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(outcomes: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        let call = requests.len();
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedProvider: no more responses (call #{call})"))
    }
}

/// A terminal text response.
pub fn text_response(text: &str) -> ProviderResponse {
    response(vec![ContentBlock::text(text)], StopReason::EndTurn)
}

/// A response requesting the given `(id, name, input)` invocations.
pub fn tool_use_response(invocations: Vec<(&str, &str, serde_json::Value)>) -> ProviderResponse {
    let content = invocations
        .into_iter()
        .map(|(id, name, input)| ContentBlock::tool_use(id, name, input))
        .collect();
    response(content, StopReason::ToolUse)
}

fn response(content: Vec<ContentBlock>, stop_reason: StopReason) -> ProviderResponse {
    ProviderResponse {
        content,
        stop_reason,
        usage: Some(Usage {
            input_tokens: 10,
            output_tokens: 5,
        }),
        model: "mock-model".into(),
    }
}
