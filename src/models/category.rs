use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Business intent of a customer email.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Ratenplan anfordern")]
    InstallmentRequest,
    #[serde(rename = "Ratenplan unterschrieben zurücksenden")]
    SignedInstallmentPlan,
    #[serde(rename = "Patient übermittelt Leistungsbescheid")]
    BenefitNotice,
    #[serde(rename = "Patient fragt erneute Zusendung des Passworts fürs Onlineportal an")]
    PortalPassword,
    #[serde(rename = "Patient braucht eine Rechnungskopie")]
    InvoiceCopy,
    #[serde(rename = "Patient möchte später zahlen")]
    PaymentDeferral,
    #[serde(rename = "Patient teilt mit, dass er überwiesen hat")]
    PaymentNotice,
    #[serde(rename = "Sonstiges")]
    Other,
}

/// Which second-stage extraction a category calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    Installment,
    InvoiceCopy,
    PaymentDeferral,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::InstallmentRequest,
        Category::SignedInstallmentPlan,
        Category::BenefitNotice,
        Category::PortalPassword,
        Category::InvoiceCopy,
        Category::PaymentDeferral,
        Category::PaymentNotice,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::InstallmentRequest => "Ratenplan anfordern",
            Category::SignedInstallmentPlan => "Ratenplan unterschrieben zurücksenden",
            Category::BenefitNotice => "Patient übermittelt Leistungsbescheid",
            Category::PortalPassword => {
                "Patient fragt erneute Zusendung des Passworts fürs Onlineportal an"
            }
            Category::InvoiceCopy => "Patient braucht eine Rechnungskopie",
            Category::PaymentDeferral => "Patient möchte später zahlen",
            Category::PaymentNotice => "Patient teilt mit, dass er überwiesen hat",
            Category::Other => "Sonstiges",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Chart legend text. Never used for scoring.
    pub fn short_label(&self) -> &'static str {
        match self {
            Category::InstallmentRequest => "Ratenplan anfordern",
            Category::SignedInstallmentPlan => "Ratenplan zurücksenden",
            Category::BenefitNotice => "Leistungsbescheid",
            Category::PortalPassword => "Passwort anfordern",
            Category::InvoiceCopy => "Rechnungskopie",
            Category::PaymentDeferral => "Später zahlen",
            Category::PaymentNotice => "Zahlung mitgeteilt",
            Category::Other => "Sonstiges",
        }
    }

    /// Prompt guidance: what the category means, with typical phrasings.
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            Category::InstallmentRequest => {
                "Patient möchte eine Ratenzahlung VEREINBAREN (z.B. \"Ich möchte in Raten zahlen\", \"Können wir eine Ratenzahlung vereinbaren?\")"
            }
            Category::SignedInstallmentPlan => {
                "Patient SCHICKT eine bereits unterschriebene Ratenvereinbarung ZURÜCK (z.B. \"Anbei die unterschriebene Vereinbarung\", \"SEPA-Mandat im Anhang\")"
            }
            Category::BenefitNotice => {
                "Patient informiert über eine Versicherungsentscheidung oder einen Leistungsbescheid (z.B. \"Meine Versicherung hat abgelehnt\", \"Leistungsbescheid anbei\")"
            }
            Category::PortalPassword => {
                "Patient braucht Zugang zum Onlineportal (z.B. \"Ich kann mich nicht einloggen\", \"Passwort vergessen\")"
            }
            Category::InvoiceCopy => {
                "Patient möchte eine Kopie oder Zweitschrift der Rechnung (z.B. \"Bitte senden Sie mir eine Rechnungskopie\")"
            }
            Category::PaymentDeferral => {
                "Patient bittet um Zahlungsaufschub OHNE Ratenzahlung (z.B. \"Ich kann erst nächsten Monat zahlen\", \"Bitte Aufschub bis...\")"
            }
            Category::PaymentNotice => {
                "Patient informiert über eine erfolgte Zahlung (z.B. \"Habe heute überwiesen\", \"Betrag wurde überwiesen\")"
            }
            Category::Other => "NUR wenn keine der anderen Kategorien passt",
        }
    }

    pub fn detail_kind(&self) -> Option<DetailKind> {
        match self {
            Category::InstallmentRequest => Some(DetailKind::Installment),
            Category::InvoiceCopy => Some(DetailKind::InvoiceCopy),
            Category::PaymentDeferral => Some(DetailKind::PaymentDeferral),
            Category::SignedInstallmentPlan
            | Category::BenefitNotice
            | Category::PortalPassword
            | Category::PaymentNotice
            | Category::Other => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display form of an arbitrary label; labels outside the enumeration pass through.
pub fn shorten_label(label: &str) -> &str {
    Category::from_label(label)
        .map(|c| c.short_label())
        .unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
            assert_eq!(Category::from_label(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(serde_json::from_str::<Category>("\"Mahnung\"").is_err());
        assert_eq!(Category::from_label("sonstiges"), None);
    }

    #[test]
    fn test_only_three_categories_carry_details() {
        let with_details: Vec<_> = Category::ALL
            .into_iter()
            .filter(|c| c.detail_kind().is_some())
            .collect();
        assert_eq!(
            with_details,
            vec![
                Category::InstallmentRequest,
                Category::InvoiceCopy,
                Category::PaymentDeferral
            ]
        );
    }

    #[test]
    fn test_shorten_label() {
        assert_eq!(shorten_label("Patient möchte später zahlen"), "Später zahlen");
        assert_eq!(shorten_label("Unbekannt"), "Unbekannt");
    }
}
