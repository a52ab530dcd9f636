pub mod ask;
pub mod courses;
pub mod onboard;

use coursemate_config::AppConfig;
use coursemate_index::{Catalog, InMemoryCourseIndex};
use std::path::PathBuf;

/// Load the catalog named on the command line, or the configured one.
pub fn load_index(
    config: &AppConfig,
    catalog: Option<PathBuf>,
) -> Result<InMemoryCourseIndex, Box<dyn std::error::Error>> {
    let path = catalog
        .or_else(|| config.retrieval.catalog_path.clone())
        .ok_or("No course catalog configured. Pass --catalog, set COURSEMATE_CATALOG, or set retrieval.catalog_path in config.toml")?;

    let catalog = Catalog::load(&path)?;
    Ok(InMemoryCourseIndex::from_catalog(catalog).with_max_results(config.retrieval.max_results))
}
