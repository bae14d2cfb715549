use anyhow::Context;
use tracing_subscriber::EnvFilter;

use mailsort::config::AppConfig;
use mailsort::services::ai::ollama::OllamaProvider;
use mailsort::services::evaluation::evaluate;
use mailsort::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    tracing::info!(
        "using Ollama LLM provider (url: {}, model: {})",
        config.ollama_url,
        config.ollama_model
    );
    let llm = OllamaProvider::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
        config.ollama_timeout,
    )
    .context("failed to build Ollama client")?;

    let state = AppState::load(config, Box::new(llm)).context("failed to load category labels")?;

    let dataset_path = state.config.dataset_path();
    let output_dir = state.config.output_dir.clone();
    let eval = evaluate(&state, &dataset_path, &output_dir)
        .await
        .with_context(|| format!("evaluation of {} failed", dataset_path.display()))?;

    tracing::info!(
        rows = eval.y_true.len(),
        accuracy = eval.report.accuracy,
        output = %output_dir.display(),
        "evaluation complete"
    );

    Ok(())
}
