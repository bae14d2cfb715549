use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use super::LlmProvider;
use crate::errors::{AppError, Result};

/// JSON schema for `T` with all subschemas inlined, so the model service
/// never has to resolve `$ref`s.
pub fn inline_schema_for<T: JsonSchema>() -> Result<serde_json::Value> {
    let generator = SchemaSettings::draft07()
        .with(|s| s.inline_subschemas = true)
        .into_generator();
    Ok(serde_json::to_value(generator.into_root_schema_for::<T>())?)
}

/// Asks the model for a value of type `T` and parses the reply.
pub async fn generate_structured<T>(llm: &dyn LlmProvider, prompt: &str) -> Result<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema = inline_schema_for::<T>()?;
    let response = llm.generate(prompt, &schema).await?;
    parse_structured(&response)
}

pub fn parse_structured<T: DeserializeOwned>(response: &str) -> Result<T> {
    let first_error = match serde_json::from_str::<T>(response) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    // Strip markdown code fences
    let trimmed = response.trim();
    let cleaned = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned).trim();

    if let Ok(value) = serde_json::from_str::<T>(cleaned) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<T>(&cleaned[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(AppError::StructuredOutput(format!(
        "reply does not match the requested schema: {first_error}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ClassificationResponse};

    #[test]
    fn test_parse_valid_json() {
        let json = r#"{"category":"Sonstiges","vorname":"Max","nachname":null,"rechnungsbetrag":12.5,"geburtsdatum":null,"anschrift":null}"#;
        let result: ClassificationResponse = parse_structured(json).unwrap();
        assert_eq!(result.category, Category::Other);
        assert_eq!(result.first_name, Some("Max".to_string()));
        assert_eq!(result.invoice_amount, Some(12.5));
    }

    #[test]
    fn test_parse_markdown_fenced_json() {
        let json = "```json\n{\"category\":\"Patient möchte später zahlen\"}\n```";
        let result: ClassificationResponse = parse_structured(json).unwrap();
        assert_eq!(result.category, Category::PaymentDeferral);
        assert_eq!(result.last_name, None);
    }

    #[test]
    fn test_parse_embedded_object() {
        let json = "Hier ist das Ergebnis: {\"category\":\"Ratenplan anfordern\"} Viele Grüße";
        let result: ClassificationResponse = parse_structured(json).unwrap();
        assert_eq!(result.category, Category::InstallmentRequest);
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        let json = r#"{"category":"Mahnung"}"#;
        let err = parse_structured::<ClassificationResponse>(json).unwrap_err();
        assert!(matches!(err, AppError::StructuredOutput(_)));
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse_structured::<ClassificationResponse>("Ich weiß es nicht.").unwrap_err();
        assert!(matches!(err, AppError::StructuredOutput(_)));
    }

    #[test]
    fn test_schema_inlines_category_enum() {
        let schema = inline_schema_for::<ClassificationResponse>().unwrap();
        let category = &schema["properties"]["category"];
        let labels = category["enum"].as_array().unwrap();
        assert_eq!(labels.len(), 8);
        assert!(schema["required"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("category")));
    }
}
