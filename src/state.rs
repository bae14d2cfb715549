use std::path::Path;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::Category;
use crate::services::ai::LlmProvider;

/// Process-wide context, built once at startup and read-only afterwards.
pub struct AppState {
    pub config: AppConfig,
    pub llm: Box<dyn LlmProvider>,
    pub labels: Vec<Category>,
}

impl AppState {
    /// Builds the state, reading the category labels from the configured file.
    pub fn load(config: AppConfig, llm: Box<dyn LlmProvider>) -> Result<Self> {
        let labels = load_labels(&config.labels_path())?;
        tracing::info!(count = labels.len(), "loaded category labels");
        Ok(Self {
            config,
            llm,
            labels,
        })
    }
}

/// Reads one label per line. Every label must name a known category.
pub fn load_labels(path: &Path) -> Result<Vec<Category>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("cannot read label file {}: {e}", path.display()))
    })?;
    parse_labels(&content)
}

pub fn parse_labels(content: &str) -> Result<Vec<Category>> {
    let labels = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            Category::from_label(line)
                .ok_or_else(|| AppError::Config(format!("unknown category label: {line:?}")))
        })
        .collect::<Result<Vec<_>>>()?;

    if labels.is_empty() {
        return Err(AppError::Config("label file contains no categories".to_string()));
    }
    Ok(labels)
}
