use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub ollama_url: String,
    pub ollama_model: String,
    pub ollama_timeout: Option<Duration>,
    pub data_dir: PathBuf,
    pub dataset_file: String,
    pub labels_file: String,
    pub output_dir: PathBuf,
    pub chart_font: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            ollama_url: env::var("OLLAMA_HOST")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string()),
            ollama_timeout: env::var("OLLAMA_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),
            dataset_file: env::var("DATASET_FILE").unwrap_or_else(|_| "data.csv".to_string()),
            labels_file: env::var("LABELS_FILE")
                .unwrap_or_else(|_| "classification_targets.txt".to_string()),
            output_dir: env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "output".to_string())
                .into(),
            chart_font: env::var("CHART_FONT")
                .unwrap_or_else(|_| "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string())
                .into(),
        }
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(&self.dataset_file)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.data_dir.join(&self.labels_file)
    }
}
