use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::metrics::ConfusionMatrix;
use crate::errors::Result;
use crate::models::{ClassificationResult, EmailRecord};

/// Reads the semicolon-separated evaluation dataset.
pub fn load_dataset(path: &Path) -> Result<Vec<EmailRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)?;

    let records = reader
        .deserialize::<EmailRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Writes the matrix with `True_<label>` rows and `Pred_<label>` columns.
pub fn write_confusion_csv(cm: &ConfusionMatrix, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let header = std::iter::once(String::new())
        .chain(cm.labels.iter().map(|l| format!("Pred_{l}")));
    writer.write_record(header)?;

    for (label, row) in cm.labels.iter().zip(&cm.counts) {
        let record = std::iter::once(format!("True_{label}"))
            .chain(row.iter().map(|count| count.to_string()));
        writer.write_record(record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes all per-row results as an indented JSON array.
pub fn write_predictions_json(predictions: &[ClassificationResult], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    predictions.serialize(&mut serializer)?;
    writer.flush()?;
    Ok(())
}

pub fn read_predictions_json(path: &Path) -> Result<Vec<ClassificationResult>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, DetailExtraction, InvoiceCopyRequest};

    #[test]
    fn test_load_dataset_reads_required_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(
            &path,
            "Id;Anliegen;Betreff;Text;Anlagen\n\
             1;Sonstiges;Hallo;\"Frage; mit Semikolon\";\n\
             2;Patient möchte später zahlen;Aufschub;Bitte bis März;brief.pdf\n",
        )
        .unwrap();

        let records = load_dataset(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, "Sonstiges");
        assert_eq!(records[0].body, "Frage; mit Semikolon");
        assert_eq!(records[0].attachments, "");
        assert_eq!(
            records[1].to_prompt_text(),
            "Betreff: Aufschub \n Text: Bitte bis März \n Anlagen: brief.pdf"
        );
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dataset(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_confusion_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cm.csv");
        let cm = ConfusionMatrix::from_labels(
            &["Sonstiges", "Patient teilt mit, dass er überwiesen hat"],
            &["Sonstiges", "Sonstiges"],
        );
        write_confusion_csv(&cm, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                ",\"Pred_Patient teilt mit, dass er überwiesen hat\",Pred_Sonstiges",
                "\"True_Patient teilt mit, dass er überwiesen hat\",0,1",
                "True_Sonstiges,0,1",
            ]
        );
    }

    #[test]
    fn test_predictions_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_predictions.json");
        let mut copy = ClassificationResult::fallback(
            "4-95181-83140807".to_string(),
            "placeholder".to_string(),
        );
        copy.category = Category::InvoiceCopy;
        copy.first_name = "Jürgen".to_string();
        copy.invoice_amount = 0.1 + 0.2;
        copy.error = None;
        copy.details = Some(DetailExtraction::InvoiceCopy(InvoiceCopyRequest {
            copies: 2,
            destination_address: "Hauptstraße 5, 12345 Köln".to_string(),
            by_email: true,
        }));
        let predictions = vec![
            copy,
            ClassificationResult::fallback(String::new(), "connection refused".to_string()),
        ];

        write_predictions_json(&predictions, &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Jürgen"));
        assert!(raw.contains("\n    {"));

        let back = read_predictions_json(&path).unwrap();
        assert_eq!(back, predictions);
    }
}
