//! Course catalog and retrieval backends for CourseMate.
//!
//! The catalog is the source material; [`InMemoryCourseIndex`] is the
//! `CourseIndex` the tools search against.

pub mod catalog;
pub mod in_memory;

pub use catalog::{Catalog, CatalogError, Course, Lesson};
pub use in_memory::InMemoryCourseIndex;
