use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::details::{null_as_default, DetailExtraction};

/// Output of the categorization call.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClassificationResponse {
    /// Die wahrscheinlichste Kategorie der Anfrage
    pub category: Category,

    /// Vorname der anfragenden Person, falls genannt
    #[serde(rename = "vorname", default)]
    pub first_name: Option<String>,

    /// Nachname der anfragenden Person, falls genannt
    #[serde(rename = "nachname", default)]
    pub last_name: Option<String>,

    /// Rechnungsbetrag der Rechnung, falls genannt
    #[serde(rename = "rechnungsbetrag", default)]
    pub invoice_amount: Option<f64>,

    /// Geburtsdatum der anfragenden Person, falls genannt
    #[serde(rename = "geburtsdatum", default)]
    pub date_of_birth: Option<String>,

    /// Anschrift der anfragenden Person, falls genannt
    #[serde(rename = "anschrift", default)]
    pub address: Option<String>,
}

/// Everything known about one email after classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredClassificationResult")]
pub struct ClassificationResult {
    #[serde(rename = "kategorie")]
    pub category: Category,
    #[serde(rename = "vorname")]
    pub first_name: String,
    #[serde(rename = "nachname")]
    pub last_name: String,
    #[serde(rename = "rechnungsbetrag")]
    pub invoice_amount: f64,
    #[serde(rename = "geburtsdatum")]
    pub date_of_birth: String,
    #[serde(rename = "anschrift")]
    pub address: String,
    #[serde(rename = "kundennummer")]
    pub customer_number: String,
    pub details: Option<DetailExtraction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassificationResult {
    /// Builds a successful result. Details are dropped unless their shape
    /// belongs to the response category.
    pub fn from_response(
        response: ClassificationResponse,
        customer_number: String,
        details: Option<DetailExtraction>,
    ) -> Self {
        let expected = response.category.detail_kind();
        let details = details.filter(|d| Some(d.kind()) == expected);

        Self {
            category: response.category,
            first_name: response.first_name.unwrap_or_default(),
            last_name: response.last_name.unwrap_or_default(),
            invoice_amount: response.invoice_amount.unwrap_or(0.0),
            date_of_birth: response.date_of_birth.unwrap_or_default(),
            address: response.address.unwrap_or_default(),
            customer_number,
            details,
            error: None,
        }
    }

    /// Catch-all result used when the categorization call fails.
    pub fn fallback(customer_number: String, error: String) -> Self {
        Self {
            category: Category::Other,
            first_name: String::new(),
            last_name: String::new(),
            invoice_amount: 0.0,
            date_of_birth: String::new(),
            address: String::new(),
            customer_number,
            details: None,
            error: Some(error),
        }
    }
}

#[derive(Deserialize)]
struct StoredClassificationResult {
    kategorie: Category,
    #[serde(default, deserialize_with = "null_as_default")]
    vorname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    nachname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    rechnungsbetrag: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    geburtsdatum: String,
    #[serde(default, deserialize_with = "null_as_default")]
    anschrift: String,
    #[serde(default, deserialize_with = "null_as_default")]
    kundennummer: String,
    #[serde(default)]
    details: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<StoredClassificationResult> for ClassificationResult {
    type Error = String;

    fn try_from(stored: StoredClassificationResult) -> Result<Self, Self::Error> {
        let details = match (stored.kategorie.detail_kind(), stored.details) {
            (_, None) => None,
            (Some(kind), Some(value)) => Some(DetailExtraction::from_value(kind, value)?),
            (None, Some(_)) => {
                return Err(format!(
                    "category `{}` does not carry details",
                    stored.kategorie
                ))
            }
        };

        Ok(Self {
            category: stored.kategorie,
            first_name: stored.vorname,
            last_name: stored.nachname,
            invoice_amount: stored.rechnungsbetrag,
            date_of_birth: stored.geburtsdatum,
            address: stored.anschrift,
            customer_number: stored.kundennummer,
            details,
            error: stored.error,
        })
    }
}
