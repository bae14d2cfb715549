use serde::Deserialize;

use super::details::null_as_default;

/// One labeled row of the evaluation dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailRecord {
    #[serde(rename = "Anliegen")]
    pub category: String,
    #[serde(rename = "Betreff", default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(rename = "Text", default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(rename = "Anlagen", default, deserialize_with = "null_as_default")]
    pub attachments: String,
}

impl EmailRecord {
    /// Text handed to the classifier.
    pub fn to_prompt_text(&self) -> String {
        format!(
            "Betreff: {} \n Text: {} \n Anlagen: {}",
            self.subject, self.body, self.attachments
        )
    }
}
