//! Course assistant: the query facade the CLI talks to.
//!
//! Wraps the answering loop with session history and citation handling:
//! every query returns the answer together with the sources the tools
//! cited while producing it.

use std::sync::Arc;
use coursemate_config::AppConfig;
use coursemate_core::provider::Provider;
use coursemate_core::retrieval::CourseIndex;
use coursemate_core::tool::{Citation, ToolRegistry};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use crate::loop_runner::AgentLoop;
use crate::session::SessionStore;

/// The answer to one query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<Citation>,
    pub session_id: String,
}

/// Catalog statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CourseAnalytics {
    pub total_courses: usize,
    pub course_titles: Vec<String>,
}

pub struct CourseAssistant {
    agent: AgentLoop,
    registry: Arc<ToolRegistry>,
    index: Arc<dyn CourseIndex>,
    sessions: SessionStore,
    /// Citation state lives in the registry, so queries run one at a time.
    query_lock: Mutex<()>,
}

impl CourseAssistant {
    pub fn new(
        agent: AgentLoop,
        registry: Arc<ToolRegistry>,
        index: Arc<dyn CourseIndex>,
        sessions: SessionStore,
    ) -> Self {
        Self {
            agent,
            registry,
            index,
            sessions,
            query_lock: Mutex::new(()),
        }
    }

    /// Wire the loop, the default tools and a session store from config.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        index: Arc<dyn CourseIndex>,
    ) -> Self {
        let agent = AgentLoop::new(provider, &config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
            .with_max_rounds(config.agent.max_tool_rounds);
        let registry = coursemate_tools::default_registry(index.clone(), config.retrieval.max_results);

        Self::new(
            agent,
            Arc::new(registry),
            index,
            SessionStore::new(config.session.max_history),
        )
    }

    /// Answer a query within a session, creating one when none is given.
    ///
    /// Citations are read once the loop finishes and then cleared, whether
    /// or not the loop succeeded.
    pub async fn query(
        &self,
        query: &str,
        session_id: Option<&str>,
    ) -> coursemate_core::Result<QueryResponse> {
        let _guard = self.query_lock.lock().await;

        let session_id = match session_id {
            Some(id) => id.to_string(),
            None => self.sessions.create_session().await,
        };
        let history = self.sessions.history(&session_id).await;

        let prompt = format!("Answer this question about course materials: {query}");
        let definitions = self.registry.definitions();
        let outcome = self
            .agent
            .answer(
                &prompt,
                history.as_deref(),
                Some(definitions.as_slice()),
                Some(self.registry.as_ref()),
            )
            .await;

        let sources = self.registry.drain_citations();
        self.registry.reset_citations();

        let answer = outcome.inspect_err(|e| warn!(session_id = %session_id, error = %e, "Query failed"))?;
        self.sessions.add_exchange(&session_id, query, &answer).await;

        info!(session_id = %session_id, sources = sources.len(), "Query complete");
        Ok(QueryResponse {
            answer,
            sources,
            session_id,
        })
    }

    pub async fn course_analytics(&self) -> CourseAnalytics {
        let course_titles = self.index.course_titles().await;
        CourseAnalytics {
            total_courses: course_titles.len(),
            course_titles,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedProvider, text_response, tool_use_response};
    use coursemate_core::error::ProviderError;
    use coursemate_index::{Catalog, Course, InMemoryCourseIndex, Lesson};
    use serde_json::json;

    fn index() -> Arc<dyn CourseIndex> {
        Arc::new(InMemoryCourseIndex::from_catalog(Catalog {
            courses: vec![
                Course {
                    title: "MCP: Build Rich-Context AI Apps".into(),
                    link: Some("https://example.com/mcp".into()),
                    instructor: None,
                    lessons: vec![Lesson {
                        number: 1,
                        title: "Why MCP".into(),
                        link: Some("https://example.com/mcp/1".into()),
                        content: "MCP standardizes how applications provide context to models.".into(),
                    }],
                },
                Course {
                    title: "Prompt Compression".into(),
                    link: None,
                    instructor: None,
                    lessons: vec![],
                },
            ],
        }))
    }

    fn assistant(provider: Arc<ScriptedProvider>) -> CourseAssistant {
        CourseAssistant::from_config(&AppConfig::default(), provider, index())
    }

    #[tokio::test]
    async fn query_returns_answer_and_sources() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_use_response(vec![("toolu_1", "search_course_content", json!({"query": "MCP context"}))]),
            text_response("MCP standardizes context."),
        ]));
        let assistant = assistant(provider.clone());

        let response = assistant.query("What is MCP?", None).await.unwrap();
        assert_eq!(response.answer, "MCP standardizes context.");
        assert_eq!(
            response.sources,
            vec![Citation::new(
                "MCP: Build Rich-Context AI Apps - Lesson 1",
                Some("https://example.com/mcp/1".into())
            )]
        );
        assert!(assistant.registry().drain_citations().is_empty());

        let requests = provider.requests();
        let first = &requests[0];
        assert_eq!(
            first.messages[0].first_text(),
            Some("Answer this question about course materials: What is MCP?")
        );
        let names: Vec<&str> = first.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["search_course_content", "get_course_outline"]);
    }

    #[tokio::test]
    async fn session_history_feeds_next_query() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            text_response("First answer"),
            text_response("Second answer"),
        ]));
        let assistant = assistant(provider.clone());

        let first = assistant.query("First question", None).await.unwrap();
        let second = assistant
            .query("Follow up", Some(&first.session_id))
            .await
            .unwrap();
        assert_eq!(second.session_id, first.session_id);

        let system = provider.requests()[1].system.clone().unwrap();
        assert!(system.ends_with(
            "\n\nPrevious conversation:\nUser: First question\nAssistant: First answer"
        ));
    }

    #[tokio::test]
    async fn failed_query_still_clears_citations() {
        let provider = Arc::new(ScriptedProvider::with_results(vec![
            Ok(tool_use_response(vec![("toolu_1", "get_course_outline", json!({"course_name": "MCP"}))])),
            Err(ProviderError::AuthenticationFailed("bad key".into())),
        ]));
        let assistant = assistant(provider);

        let err = assistant.query("Outline of MCP?", Some("s1")).await.unwrap_err();
        assert!(err.to_string().contains("bad key"));
        assert!(assistant.registry().drain_citations().is_empty());
        assert!(assistant.sessions().history("s1").await.is_none());
    }

    #[tokio::test]
    async fn analytics_lists_courses() {
        let assistant = assistant(Arc::new(ScriptedProvider::new(vec![])));
        let analytics = assistant.course_analytics().await;
        assert_eq!(analytics.total_courses, 2);
        assert!(analytics.course_titles.contains(&"Prompt Compression".to_string()));
    }
}
