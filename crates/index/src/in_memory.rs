//! In-memory course index: keyword retrieval over a loaded catalog.
//!
//! Lesson content is split into paragraph chunks. A chunk's score is the
//! fraction of distinct query terms it contains; ties keep catalog order.

use async_trait::async_trait;
use coursemate_core::retrieval::{
    CourseIndex, CourseOutline, LessonOutline, SearchHit, SearchQuery, SearchResults,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use crate::catalog::{Catalog, Course};

const DEFAULT_MAX_RESULTS: usize = 5;

/// One searchable paragraph of a lesson.
#[derive(Debug, Clone)]
struct Chunk {
    course_title: String,
    lesson_number: u32,
    content: String,
    lowered: String,
}

#[derive(Debug, Default)]
struct IndexState {
    courses: Vec<Course>,
    chunks: Vec<Chunk>,
}

/// A `CourseIndex` held entirely in memory.
pub struct InMemoryCourseIndex {
    state: Arc<RwLock<IndexState>>,
    max_results: usize,
}

impl InMemoryCourseIndex {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(IndexState::default())),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Build an index over every course in a catalog.
    pub fn from_catalog(catalog: Catalog) -> Self {
        let mut state = IndexState::default();
        for course in catalog.courses {
            state.insert(course);
        }
        info!(
            courses = state.courses.len(),
            chunks = state.chunks.len(),
            "Built in-memory course index"
        );
        Self {
            state: Arc::new(RwLock::new(state)),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Cap on hits when a query does not set its own limit.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Add a course, replacing any course with the same title.
    pub async fn add_course(&self, course: Course) {
        self.state.write().await.insert(course);
    }

    pub async fn course_count(&self) -> usize {
        self.state.read().await.courses.len()
    }
}

impl Default for InMemoryCourseIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexState {
    fn insert(&mut self, course: Course) {
        self.courses.retain(|c| c.title != course.title);
        self.chunks.retain(|c| c.course_title != course.title);

        for lesson in &course.lessons {
            for paragraph in split_paragraphs(&lesson.content) {
                self.chunks.push(Chunk {
                    course_title: course.title.clone(),
                    lesson_number: lesson.number,
                    lowered: paragraph.to_lowercase(),
                    content: paragraph,
                });
            }
        }
        self.courses.push(course);
    }

    /// Resolve a possibly partial course name to a catalog title.
    ///
    /// An exact case-insensitive match wins; otherwise the shortest title
    /// containing the name.
    fn resolve_course(&self, name: &str) -> Option<&Course> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        if let Some(course) = self.courses.iter().find(|c| c.title.to_lowercase() == wanted) {
            return Some(course);
        }

        self.courses
            .iter()
            .filter(|c| c.title.to_lowercase().contains(&wanted))
            .min_by_key(|c| c.title.len())
    }
}

fn split_paragraphs(content: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

fn query_terms(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl CourseIndex for InMemoryCourseIndex {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn search(&self, query: &SearchQuery) -> SearchResults {
        let state = self.state.read().await;

        let course_title = match query.course_name.as_deref() {
            Some(name) => match state.resolve_course(name) {
                Some(course) => Some(course.title.as_str()),
                None => {
                    debug!(course = name, "Course filter matched nothing");
                    return SearchResults::default();
                }
            },
            None => None,
        };

        let terms = query_terms(&query.text);
        if terms.is_empty() {
            return SearchResults::default();
        }

        let mut hits: Vec<SearchHit> = state
            .chunks
            .iter()
            .filter(|c| course_title.is_none_or(|t| c.course_title == t))
            .filter(|c| query.lesson_number.is_none_or(|n| c.lesson_number == n))
            .filter_map(|c| {
                let matched = terms.iter().filter(|t| c.lowered.contains(t.as_str())).count();
                (matched > 0).then(|| SearchHit {
                    content: c.content.clone(),
                    course_title: c.course_title.clone(),
                    lesson_number: Some(c.lesson_number),
                    score: matched as f32 / terms.len() as f32,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(query.limit.unwrap_or(self.max_results));

        debug!(query = %query.text, hits = hits.len(), "In-memory search complete");
        SearchResults::from_hits(hits)
    }

    async fn lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String> {
        let state = self.state.read().await;
        state
            .courses
            .iter()
            .find(|c| c.title == course_title)?
            .lessons
            .iter()
            .find(|l| l.number == lesson_number)?
            .link
            .clone()
    }

    async fn course_outline(&self, course_name: &str) -> Option<CourseOutline> {
        let state = self.state.read().await;
        let course = state.resolve_course(course_name)?;

        let mut lessons: Vec<LessonOutline> = course
            .lessons
            .iter()
            .map(|l| LessonOutline {
                number: l.number,
                title: l.title.clone(),
                link: l.link.clone(),
            })
            .collect();
        lessons.sort_by_key(|l| l.number);

        Some(CourseOutline {
            title: course.title.clone(),
            link: course.link.clone(),
            instructor: course.instructor.clone(),
            lessons,
        })
    }

    async fn course_titles(&self) -> Vec<String> {
        let state = self.state.read().await;
        state.courses.iter().map(|c| c.title.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Lesson;

    fn lesson(number: u32, content: &str) -> Lesson {
        Lesson {
            number,
            title: format!("Lesson {number}"),
            link: Some(format!("https://example.com/lesson{number}")),
            content: content.into(),
        }
    }

    fn sample_index() -> InMemoryCourseIndex {
        InMemoryCourseIndex::from_catalog(Catalog {
            courses: vec![
                Course {
                    title: "MCP: Build Rich-Context AI Apps".into(),
                    link: Some("https://example.com/mcp".into()),
                    instructor: Some("Elie Schoppik".into()),
                    lessons: vec![
                        lesson(2, "MCP servers expose tools.\n\nClients connect to servers."),
                        lesson(1, "MCP is an open protocol for context."),
                    ],
                },
                Course {
                    title: "Building Towards Computer Use".into(),
                    link: None,
                    instructor: None,
                    lessons: vec![lesson(1, "Tool use lets the model call functions.")],
                },
            ],
        })
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let parts = split_paragraphs("first line\nstill first\n\n\n  \nsecond\n");
        assert_eq!(parts, vec!["first line\nstill first", "second"]);
        assert!(split_paragraphs("").is_empty());
    }

    #[tokio::test]
    async fn search_ranks_by_term_coverage() {
        let index = sample_index();
        let results = index.search(&SearchQuery::new("MCP servers")).await;
        assert!(results.error.is_none());
        assert_eq!(results.hits[0].content, "MCP servers expose tools.");
        assert_eq!(results.hits[0].score, 1.0);
        assert!(results.hits.iter().skip(1).all(|h| h.score < 1.0));
    }

    #[tokio::test]
    async fn search_respects_limit() {
        let index = sample_index().with_max_results(1);
        let results = index.search(&SearchQuery::new("tools servers protocol")).await;
        assert_eq!(results.hits.len(), 1);

        let mut query = SearchQuery::new("tools servers protocol");
        query.limit = Some(3);
        assert_eq!(index.search(&query).await.hits.len(), 3);
    }

    #[tokio::test]
    async fn course_filter_matches_partial_name() {
        let index = sample_index();
        let results = index.search(&SearchQuery::new("tool").with_course("computer")).await;
        assert_eq!(results.hits.len(), 1);
        assert_eq!(results.hits[0].course_title, "Building Towards Computer Use");
    }

    #[tokio::test]
    async fn lesson_filter_narrows_hits() {
        let index = sample_index();
        let results = index
            .search(&SearchQuery::new("MCP").with_course("mcp").with_lesson(1))
            .await;
        assert_eq!(results.hits.len(), 1);
        assert_eq!(results.hits[0].lesson_number, Some(1));
    }

    #[tokio::test]
    async fn unknown_course_filter_yields_empty_results() {
        let index = sample_index();
        let results = index.search(&SearchQuery::new("MCP").with_course("Kubernetes")).await;
        assert!(results.is_empty());
        assert!(results.error.is_none());
    }

    #[tokio::test]
    async fn lesson_link_lookup() {
        let index = sample_index();
        assert_eq!(
            index.lesson_link("MCP: Build Rich-Context AI Apps", 2).await.as_deref(),
            Some("https://example.com/lesson2")
        );
        assert!(index.lesson_link("MCP: Build Rich-Context AI Apps", 9).await.is_none());
        assert!(index.lesson_link("MCP", 1).await.is_none());
    }

    #[tokio::test]
    async fn outline_lists_lessons_in_order() {
        let index = sample_index();
        let outline = index.course_outline("rich-context").await.unwrap();
        assert_eq!(outline.title, "MCP: Build Rich-Context AI Apps");
        assert_eq!(outline.instructor.as_deref(), Some("Elie Schoppik"));
        let numbers: Vec<u32> = outline.lessons.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(index.course_outline("nope").await.is_none());
    }

    #[tokio::test]
    async fn add_course_replaces_same_title() {
        let index = sample_index();
        index
            .add_course(Course {
                title: "Building Towards Computer Use".into(),
                link: None,
                instructor: None,
                lessons: vec![lesson(1, "Screenshots drive the agent.")],
            })
            .await;

        assert_eq!(index.course_count().await, 2);
        assert!(index.search(&SearchQuery::new("functions")).await.is_empty());
        assert_eq!(index.search(&SearchQuery::new("screenshots")).await.hits.len(), 1);
        assert_eq!(
            index.course_titles().await,
            vec!["MCP: Build Rich-Context AI Apps", "Building Towards Computer Use"]
        );
    }
}
