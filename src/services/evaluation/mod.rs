pub mod artifacts;
pub mod charts;
pub mod metrics;

use std::path::Path;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use crate::errors::Result;
use crate::models::ClassificationResult;
use crate::services::classifier::classify;
use crate::state::AppState;

use self::metrics::{ClassificationReport, ConfusionMatrix};

pub const CONFUSION_MATRIX_CSV: &str = "confusion_matrix.csv";
pub const PREDICTIONS_JSON: &str = "all_predictions.json";
pub const CONFUSION_MATRIX_PNG: &str = "confusion_matrix.png";
pub const CLASS_DISTRIBUTION_PNG: &str = "class_distribution.png";
pub const METRICS_PER_CLASS_PNG: &str = "metrics_per_class.png";

/// Outcome of one evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub y_true: Vec<String>,
    pub y_pred: Vec<String>,
    pub predictions: Vec<ClassificationResult>,
    pub confusion: ConfusionMatrix,
    pub report: ClassificationReport,
    pub elapsed: Duration,
}

/// Classifies every row of the dataset, scores the predictions and writes
/// the artifacts into `output_dir`.
pub async fn evaluate(
    state: &AppState,
    dataset_path: &Path,
    output_dir: &Path,
) -> Result<EvaluationReport> {
    tracing::info!(path = %dataset_path.display(), "loading dataset");
    let records = artifacts::load_dataset(dataset_path)?;
    std::fs::create_dir_all(output_dir)?;

    tracing::info!(rows = records.len(), "starting inference");
    let progress = ProgressBar::new(records.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}<{eta_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let started = Instant::now();
    let mut predictions = Vec::with_capacity(records.len());
    for record in &records {
        predictions.push(classify(state, &record.to_prompt_text()).await);
        progress.inc(1);
    }
    progress.finish_and_clear();
    let elapsed = started.elapsed();
    tracing::info!(seconds = elapsed.as_secs_f64(), "inference finished");

    let y_true: Vec<String> = records.into_iter().map(|r| r.category).collect();
    let y_pred: Vec<String> = predictions
        .iter()
        .map(|p| p.category.as_str().to_string())
        .collect();

    let confusion = ConfusionMatrix::from_labels(&y_true, &y_pred);
    let report = ClassificationReport::from_confusion(&confusion);

    let eval = EvaluationReport {
        y_true,
        y_pred,
        predictions,
        confusion,
        report,
        elapsed,
    };
    print_summary(&eval);

    artifacts::write_confusion_csv(&eval.confusion, &output_dir.join(CONFUSION_MATRIX_CSV))?;
    artifacts::write_predictions_json(&eval.predictions, &output_dir.join(PREDICTIONS_JSON))?;
    tracing::info!(dir = %output_dir.display(), "wrote confusion matrix and predictions");

    render_charts(state, &eval, output_dir);

    Ok(eval)
}

fn print_summary(eval: &EvaluationReport) {
    let rule = "=".repeat(50);
    println!("Inference finished in {:.2} seconds.", eval.elapsed.as_secs_f64());
    println!("\n{rule}");
    println!("ACCURACY: {:.2}%", eval.report.accuracy * 100.0);
    println!("{rule}");
    println!("\n--- Classification Report ---");
    println!("{}", eval.report);
    println!("--- Confusion Matrix ---");
    println!("{}", eval.confusion);
}

/// Charts are derived artifacts: failures are logged, never propagated.
fn render_charts(state: &AppState, eval: &EvaluationReport, output_dir: &Path) {
    if eval.y_true.is_empty() {
        tracing::warn!("dataset is empty, skipping charts");
        return;
    }
    if let Err(e) = charts::register_chart_font(&state.config.chart_font) {
        tracing::error!(error = %e, "skipping charts");
        return;
    }

    let outcomes = [
        (
            CONFUSION_MATRIX_PNG,
            charts::plot_confusion_matrix(&eval.confusion, &output_dir.join(CONFUSION_MATRIX_PNG)),
        ),
        (
            CLASS_DISTRIBUTION_PNG,
            charts::plot_class_distribution(
                &eval.y_true,
                &eval.y_pred,
                &output_dir.join(CLASS_DISTRIBUTION_PNG),
            ),
        ),
        (
            METRICS_PER_CLASS_PNG,
            charts::plot_metrics_per_class(&eval.report, &output_dir.join(METRICS_PER_CLASS_PNG)),
        ),
    ];

    for (name, outcome) in outcomes {
        match outcome {
            Ok(()) => tracing::info!(chart = name, "chart saved"),
            Err(e) => tracing::error!(chart = name, error = %e, "failed to render chart"),
        }
    }
}
