use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Counts of (true label, predicted label) pairs over a sorted label set.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    /// Sorted union of every true and every predicted label.
    pub labels: Vec<String>,
    /// `counts[i][j]`: rows with true label `labels[i]` predicted as `labels[j]`.
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn from_labels<T: AsRef<str>, P: AsRef<str>>(y_true: &[T], y_pred: &[P]) -> Self {
        let distinct: BTreeSet<&str> = y_true
            .iter()
            .map(|t| t.as_ref())
            .chain(y_pred.iter().map(|p| p.as_ref()))
            .collect();
        let index: HashMap<&str, usize> = distinct
            .iter()
            .enumerate()
            .map(|(i, label)| (*label, i))
            .collect();

        let mut counts = vec![vec![0usize; distinct.len()]; distinct.len()];
        for (t, p) in y_true.iter().zip(y_pred) {
            counts[index[t.as_ref()]][index[p.as_ref()]] += 1;
        }

        Self {
            labels: distinct.into_iter().map(str::to_string).collect(),
            counts,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }

    fn row_sum(&self, i: usize) -> usize {
        self.counts[i].iter().sum()
    }

    fn column_sum(&self, j: usize) -> usize {
        self.counts.iter().map(|row| row[j]).sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self.labels.iter().map(|l| format!("True_{l}")).collect();
        let row_width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

        write!(f, "{:row_width$}", "")?;
        for label in &self.labels {
            write!(f, "  Pred_{label}")?;
        }
        writeln!(f)?;

        for (row, counts) in rows.iter().zip(&self.counts) {
            write!(f, "{row:<row_width$}")?;
            for (label, count) in self.labels.iter().zip(counts) {
                let width = label.chars().count() + 5;
                write!(f, "  {count:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-label precision/recall/F1 plus accuracy and averages.
/// Divisions by zero count as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub per_label: Vec<LabelMetrics>,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
}

impl ClassificationReport {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let total = cm.total();
        let accuracy = ratio(cm.correct(), total);

        let per_label: Vec<LabelMetrics> = cm
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let true_positive = cm.counts[i][i];
                let precision = ratio(true_positive, cm.column_sum(i));
                let support = cm.row_sum(i);
                let recall = ratio(true_positive, support);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                LabelMetrics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        let mut macro_avg = AverageMetrics {
            support: total,
            ..Default::default()
        };
        let mut weighted_avg = macro_avg;
        if !per_label.is_empty() {
            let n = per_label.len() as f64;
            macro_avg.precision = per_label.iter().map(|m| m.precision).sum::<f64>() / n;
            macro_avg.recall = per_label.iter().map(|m| m.recall).sum::<f64>() / n;
            macro_avg.f1 = per_label.iter().map(|m| m.f1).sum::<f64>() / n;
        }
        if total > 0 {
            let weight = |m: &LabelMetrics| m.support as f64 / total as f64;
            weighted_avg.precision = per_label.iter().map(|m| m.precision * weight(m)).sum();
            weighted_avg.recall = per_label.iter().map(|m| m.recall * weight(m)).sum();
            weighted_avg.f1 = per_label.iter().map(|m| m.f1 * weight(m)).sum();
        }

        Self {
            accuracy,
            per_label,
            macro_avg,
            weighted_avg,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .per_label
            .iter()
            .map(|m| m.label.chars().count())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}\n",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for m in &self.per_label {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, avg.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_confusion_matrix_counts() {
        let y_true = ["b", "a", "a", "c"];
        let y_pred = ["b", "a", "b", "d"];
        let cm = ConfusionMatrix::from_labels(&y_true, &y_pred);

        assert_eq!(cm.labels, vec!["a", "b", "c", "d"]);
        assert_eq!(
            cm.counts,
            vec![
                vec![1, 1, 0, 0],
                vec![0, 1, 0, 0],
                vec![0, 0, 0, 1],
                vec![0, 0, 0, 0],
            ]
        );
        assert_eq!(cm.total(), 4);
        assert_eq!(cm.correct(), 2);
    }

    #[test]
    fn test_perfect_predictions() {
        let labels = ["x", "y", "y"];
        let report = ClassificationReport::from_confusion(&ConfusionMatrix::from_labels(
            &labels, &labels,
        ));
        assert!(approx(report.accuracy, 1.0));
        assert!(report.per_label.iter().all(|m| approx(m.f1, 1.0)));
        assert!(approx(report.weighted_avg.f1, 1.0));
    }

    #[test]
    fn test_no_correct_predictions() {
        let report = ClassificationReport::from_confusion(&ConfusionMatrix::from_labels(
            &["x", "y"],
            &["y", "x"],
        ));
        assert!(approx(report.accuracy, 0.0));
        assert!(approx(report.macro_avg.f1, 0.0));
    }

    #[test]
    fn test_zero_division_is_zero() {
        // "d" is predicted but never true; "c" is true but never predicted.
        let report = ClassificationReport::from_confusion(&ConfusionMatrix::from_labels(
            &["a", "c"],
            &["a", "d"],
        ));
        let c = report.per_label.iter().find(|m| m.label == "c").unwrap();
        assert!(approx(c.precision, 0.0));
        assert!(approx(c.recall, 0.0));
        let d = report.per_label.iter().find(|m| m.label == "d").unwrap();
        assert_eq!(d.support, 0);
        assert!(approx(d.recall, 0.0));
        assert!(approx(report.accuracy, 0.5));
    }

    #[test]
    fn test_precision_recall_f1() {
        let y_true = ["a", "a", "a", "b"];
        let y_pred = ["a", "a", "b", "b"];
        let report =
            ClassificationReport::from_confusion(&ConfusionMatrix::from_labels(&y_true, &y_pred));

        let a = &report.per_label[0];
        assert!(approx(a.precision, 1.0));
        assert!(approx(a.recall, 2.0 / 3.0));
        assert!(approx(a.f1, 0.8));
        let b = &report.per_label[1];
        assert!(approx(b.precision, 0.5));
        assert!(approx(b.recall, 1.0));

        assert!(approx(report.macro_avg.precision, 0.75));
        assert!(approx(
            report.weighted_avg.recall,
            0.75 * (2.0 / 3.0) + 0.25 * 1.0
        ));
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        let cm = ConfusionMatrix::from_labels(&empty, &empty);
        let report = ClassificationReport::from_confusion(&cm);
        assert!(cm.labels.is_empty());
        assert!(approx(report.accuracy, 0.0));
        assert!(report.per_label.is_empty());
    }

    #[test]
    fn test_report_display_lists_labels() {
        let report = ClassificationReport::from_confusion(&ConfusionMatrix::from_labels(
            &["Sonstiges"],
            &["Sonstiges"],
        ));
        let text = report.to_string();
        assert!(text.contains("Sonstiges"));
        assert!(text.contains("weighted avg"));
        assert!(text.contains("1.00"));
    }
}
