//! Retrieval backend trait: what course tools search against.
//!
//! The ranking behind `search` is the backend's business; tools only rely
//! on hits arriving best-first and on an empty hit list being a normal
//! outcome, distinct from a populated `error`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A search over course content with optional filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query
    pub text: String,

    /// Course filter; partial names are resolved by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,

    /// Lesson-number filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<u32>,

    /// Maximum hits; `None` means the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_course(mut self, course_name: impl Into<String>) -> Self {
        self.course_name = Some(course_name.into());
        self
    }

    pub fn with_lesson(mut self, lesson_number: u32) -> Self {
        self.lesson_number = Some(lesson_number);
        self
    }
}

/// One matched chunk of course content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub content: String,
    pub course_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<u32>,
    pub score: f32,
}

/// Hits in rank order, or the reason the search could not run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResults {
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        Self { hits, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            hits: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// A course's structure as shown by the outline tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseOutline {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    pub lessons: Vec<LessonOutline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonOutline {
    pub number: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// The retrieval backend.
#[async_trait]
pub trait CourseIndex: Send + Sync {
    /// A human-readable name for this backend (e.g., "in_memory").
    fn name(&self) -> &str;

    /// Search course content.
    async fn search(&self, query: &SearchQuery) -> SearchResults;

    /// Link to a specific lesson, if known.
    async fn lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String>;

    /// Outline of the course best matching `course_name`.
    async fn course_outline(&self, course_name: &str) -> Option<CourseOutline>;

    /// Titles of every indexed course.
    async fn course_titles(&self) -> Vec<String>;
}
