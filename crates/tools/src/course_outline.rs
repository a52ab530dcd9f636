//! Course outline tool: title, link and lesson list of one course.

use async_trait::async_trait;
use coursemate_core::error::ToolError;
use coursemate_core::retrieval::{CourseIndex, CourseOutline};
use coursemate_core::tool::{Citation, Tool, ToolOutput};
use serde::Deserialize;
use std::sync::Arc;

const TOOL_NAME: &str = "get_course_outline";

pub struct CourseOutlineTool {
    index: Arc<dyn CourseIndex>,
}

impl CourseOutlineTool {
    pub fn new(index: Arc<dyn CourseIndex>) -> Self {
        Self { index }
    }
}

#[derive(Debug, Deserialize)]
struct OutlineArgs {
    course_name: String,
}

#[async_trait]
impl Tool for CourseOutlineTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Get the complete outline of a course: title, link and every lesson with its number, title and link"
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "course_name": {
                    "type": "string",
                    "description": "Course title (partial matches work, e.g. 'MCP', 'Computer Use')"
                }
            },
            "required": ["course_name"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let args: OutlineArgs = serde_json::from_value(input)
            .map_err(|e| ToolError::InvalidArguments(format!("{TOOL_NAME}: {e}")))?;

        let Some(outline) = self.index.course_outline(&args.course_name).await else {
            return Ok(ToolOutput::text(format!(
                "No course found matching '{}'.",
                args.course_name
            )));
        };

        let citation = Citation::new(&outline.title, outline.link.clone());
        Ok(ToolOutput::with_citations(render(&outline), vec![citation]))
    }
}

fn render(outline: &CourseOutline) -> String {
    let mut out = format!("Course: {}\n", outline.title);
    out.push_str(&format!("Link: {}\n", outline.link.as_deref().unwrap_or("(none)")));
    if let Some(ref instructor) = outline.instructor {
        out.push_str(&format!("Instructor: {instructor}\n"));
    }

    out.push_str(&format!("\nLessons ({}):", outline.lessons.len()));
    for lesson in &outline.lessons {
        out.push_str(&format!("\n{}. {}", lesson.number, lesson.title));
        if let Some(ref link) = lesson.link {
            out.push_str(&format!(" - {link}"));
        }
    }
    out
}
