//! Course catalog: the source material the index is built from.
//!
//! A catalog is a JSON document:
//!
//! ```json
//! {
//!   "courses": [
//!     {
//!       "title": "Building Towards Computer Use",
//!       "link": "https://example.com/computer-use",
//!       "instructor": "Colt Steele",
//!       "lessons": [
//!         { "number": 0, "title": "Introduction", "link": "https://...", "content": "..." }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// A course and its lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course title; also the course identifier
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,

    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// A single lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub number: u32,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Lesson transcript or notes; paragraphs separated by blank lines
    #[serde(default)]
    pub content: String,
}

/// A set of courses with unique titles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub courses: Vec<Course>,
}

impl Catalog {
    /// Load and validate a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let catalog: Self = serde_json::from_str(&content).map_err(|e| CatalogError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        catalog.validate()?;
        info!(
            path = %path.display(),
            courses = catalog.courses.len(),
            "Loaded course catalog"
        );
        Ok(catalog)
    }

    /// Course titles must be non-empty and unique.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for course in &self.courses {
            if course.title.trim().is_empty() {
                return Err(CatalogError::Invalid("course with an empty title".into()));
            }
            if !seen.insert(course.title.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate course title '{}'",
                    course.title
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

/// Catalog loading errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse catalog at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}
