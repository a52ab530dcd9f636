//! Course content search tool.
//!
//! Runs a filtered search against the course index and renders the hits
//! as labelled paragraphs. Every hit is cited with its lesson link when the
//! index knows one.

use async_trait::async_trait;
use coursemate_core::error::ToolError;
use coursemate_core::retrieval::{CourseIndex, SearchHit, SearchQuery};
use coursemate_core::tool::{Citation, Tool, ToolOutput};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const TOOL_NAME: &str = "search_course_content";

pub struct CourseSearchTool {
    index: Arc<dyn CourseIndex>,
    max_results: usize,
}

impl CourseSearchTool {
    pub fn new(index: Arc<dyn CourseIndex>, max_results: usize) -> Self {
        Self { index, max_results }
    }
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    course_name: Option<String>,
    #[serde(default)]
    lesson_number: Option<u32>,
}

#[async_trait]
impl Tool for CourseSearchTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Search course materials with smart course name matching and lesson filtering"
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for in the course content"
                },
                "course_name": {
                    "type": "string",
                    "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                },
                "lesson_number": {
                    "type": "integer",
                    "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let args: SearchArgs = serde_json::from_value(input)
            .map_err(|e| ToolError::InvalidArguments(format!("{TOOL_NAME}: {e}")))?;

        let mut query = SearchQuery::new(&args.query);
        query.course_name = args.course_name.clone();
        query.lesson_number = args.lesson_number;
        query.limit = Some(self.max_results);

        let results = self.index.search(&query).await;
        if let Some(error) = results.error {
            return Err(ToolError::ExecutionFailed {
                tool_name: TOOL_NAME.into(),
                reason: format!("Search error: {error}"),
            });
        }

        if results.hits.is_empty() {
            debug!(query = %args.query, "Search returned no hits");
            return Ok(ToolOutput::text(no_results_message(
                args.course_name.as_deref(),
                args.lesson_number,
            )));
        }

        let mut blocks = Vec::with_capacity(results.hits.len());
        let mut citations = Vec::with_capacity(results.hits.len());
        for hit in &results.hits {
            let label = hit_label(hit);
            let url = match hit.lesson_number {
                Some(n) => self.index.lesson_link(&hit.course_title, n).await,
                None => None,
            };
            blocks.push(format!("[{label}]\n{}", hit.content));
            citations.push(Citation::new(label, url));
        }

        Ok(ToolOutput::with_citations(blocks.join("\n\n"), citations))
    }
}

/// "<course> - Lesson <n>", or just the course title.
fn hit_label(hit: &SearchHit) -> String {
    match hit.lesson_number {
        Some(n) => format!("{} - Lesson {n}", hit.course_title),
        None => hit.course_title.clone(),
    }
}

fn no_results_message(course_name: Option<&str>, lesson_number: Option<u32>) -> String {
    let mut message = String::from("No relevant content found");
    if let Some(course) = course_name {
        message.push_str(&format!(" in course '{course}'"));
    }
    if let Some(n) = lesson_number {
        message.push_str(&format!(" in lesson {n}"));
    }
    message.push('.');
    message
}
