use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::category::DetailKind;

/// Treats an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Extrahierte Angaben zu einer Ratenzahlungsanfrage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InstallmentRequest {
    /// Gewünschte monatliche Rate in EUR
    #[serde(rename = "ratenhoehe", default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<f64>")]
    pub monthly_amount: f64,

    /// Gewünschte Anzahl der Raten
    #[serde(rename = "ratenanzahl", default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<u32>")]
    pub installments: u32,

    /// Gewünschtes Startdatum (z.B. '01.02.2025')
    #[serde(rename = "startdatum", default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub start_date: String,

    /// Tag im Monat für die Abbuchung (1-28)
    #[serde(rename = "abbuchungstag", default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<u32>")]
    pub debit_day: u32,
}

impl InstallmentRequest {
    fn normalize(mut self) -> Self {
        if !(self.monthly_amount >= 0.0) {
            self.monthly_amount = 0.0;
        }
        if !(1..=28).contains(&self.debit_day) {
            self.debit_day = 0;
        }
        self
    }
}

/// Extrahierte Angaben zu einer angeforderten Rechnungskopie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InvoiceCopyRequest {
    /// Anzahl gewünschter Kopien
    #[serde(rename = "anzahl_kopien", default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<u32>")]
    pub copies: u32,

    /// Adresse für den Versand (falls genannt)
    #[serde(rename = "zieladresse", default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub destination_address: String,

    /// Soll die Kopie per E-Mail geschickt werden?
    #[serde(rename = "per_email", default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<bool>")]
    pub by_email: bool,
}

impl Default for InvoiceCopyRequest {
    fn default() -> Self {
        Self {
            copies: 1,
            destination_address: String::new(),
            by_email: false,
        }
    }
}

impl InvoiceCopyRequest {
    fn normalize(mut self) -> Self {
        self.copies = self.copies.max(1);
        self
    }
}

/// Extrahierte Angaben zu einem Zahlungsaufschub.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PaymentDeferralRequest {
    /// Gewünschtes neues Zahlungsziel
    #[serde(rename = "zieldatum", default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub target_date: String,

    /// Begründung (z.B. 'warte auf Versicherung')
    #[serde(rename = "grund", default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub reason: String,
}

/// Second-stage extraction, one shape per detail-bearing category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DetailExtraction {
    Installment(InstallmentRequest),
    InvoiceCopy(InvoiceCopyRequest),
    PaymentDeferral(PaymentDeferralRequest),
}

impl DetailExtraction {
    pub fn kind(&self) -> DetailKind {
        match self {
            DetailExtraction::Installment(_) => DetailKind::Installment,
            DetailExtraction::InvoiceCopy(_) => DetailKind::InvoiceCopy,
            DetailExtraction::PaymentDeferral(_) => DetailKind::PaymentDeferral,
        }
    }

    /// Clamps values the model may produce outside their documented range.
    pub fn normalized(self) -> Self {
        match self {
            DetailExtraction::Installment(d) => DetailExtraction::Installment(d.normalize()),
            DetailExtraction::InvoiceCopy(d) => DetailExtraction::InvoiceCopy(d.normalize()),
            other => other,
        }
    }

    /// Reads a detail object whose shape is fixed by `kind`.
    ///
    /// Keys belonging to another shape are rejected so that a stored result
    /// cannot pair a category with the wrong detail object.
    pub fn from_value(kind: DetailKind, value: serde_json::Value) -> Result<Self, String> {
        const ALL_KEYS: [(&str, DetailKind); 9] = [
            ("ratenhoehe", DetailKind::Installment),
            ("ratenanzahl", DetailKind::Installment),
            ("startdatum", DetailKind::Installment),
            ("abbuchungstag", DetailKind::Installment),
            ("anzahl_kopien", DetailKind::InvoiceCopy),
            ("zieladresse", DetailKind::InvoiceCopy),
            ("per_email", DetailKind::InvoiceCopy),
            ("zieldatum", DetailKind::PaymentDeferral),
            ("grund", DetailKind::PaymentDeferral),
        ];

        let object = value
            .as_object()
            .ok_or_else(|| "details must be a JSON object".to_string())?;
        for (key, owner) in ALL_KEYS {
            if owner != kind && object.contains_key(key) {
                return Err(format!("detail field `{key}` does not belong to {kind:?}"));
            }
        }

        let parsed = match kind {
            DetailKind::Installment => serde_json::from_value(value).map(Self::Installment),
            DetailKind::InvoiceCopy => serde_json::from_value(value).map(Self::InvoiceCopy),
            DetailKind::PaymentDeferral => {
                serde_json::from_value(value).map(Self::PaymentDeferral)
            }
        };
        parsed.map_err(|e| e.to_string())
    }
}
