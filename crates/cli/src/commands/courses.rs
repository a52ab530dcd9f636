//! `coursemate courses`: List the indexed courses.

use coursemate_config::AppConfig;
use coursemate_core::retrieval::CourseIndex;
use std::path::PathBuf;

pub async fn run(catalog: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let index = super::load_index(&config, catalog)?;

    let titles = index.course_titles().await;
    println!("{} course(s) indexed:", titles.len());
    for title in &titles {
        match index.course_outline(title).await {
            Some(outline) => println!("  - {title} ({} lessons)", outline.lessons.len()),
            None => println!("  - {title}"),
        }
    }

    Ok(())
}
