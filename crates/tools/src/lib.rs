//! Built-in tool implementations for CourseMate.
//!
//! Tools give the model its only view of course material: keyword search
//! over lesson content, and the outline of a single course.

pub mod course_outline;
pub mod course_search;

use coursemate_core::retrieval::CourseIndex;
use coursemate_core::tool::ToolRegistry;
use std::sync::Arc;

pub use course_outline::CourseOutlineTool;
pub use course_search::CourseSearchTool;

/// Create the default registry: search first, then outline.
pub fn default_registry(index: Arc<dyn CourseIndex>, max_results: usize) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CourseSearchTool::new(index.clone(), max_results)));
    registry.register(Box::new(CourseOutlineTool::new(index)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursemate_index::InMemoryCourseIndex;

    #[test]
    fn default_registry_menu() {
        let registry = default_registry(Arc::new(InMemoryCourseIndex::new()), 5);
        assert_eq!(registry.names(), vec!["search_course_content", "get_course_outline"]);

        let defs = registry.definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].input_schema["required"][0], "query");
        assert_eq!(defs[1].input_schema["required"][0], "course_name");
    }
}
