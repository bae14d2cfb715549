use crate::models::{Category, DetailKind};

const CLASSIFICATION_INTRO: &str = r#"Du bist ein Experte für die Klassifikation von Kunden-E-Mails im medizinischen Abrechnungsbereich und für die Extraktion hilfreicher Informationen aus diesen E-Mails.

AUFGABE: Analysiere die E-Mail und wähle die EINE passendste Kategorie.
KATEGORIEN (wähle genau eine):
"#;

const CLASSIFICATION_EXTRACTION: &str = r#"
EXTRAKTIONSAUFGABE: Extrahiere zusätzlich folgende Angaben präzise aus der E-Mail:
- "vorname": Vorname der anfragenden Person, falls genannt
- "nachname": Nachname der anfragenden Person, falls genannt
- "geburtsdatum": Geburtsdatum der anfragenden Person, falls genannt
- "anschrift": Anschrift der anfragenden Person, falls genannt
- "rechnungsbetrag": Rechnungsbetrag der Rechnung, falls genannt

Wenn eine Angabe nicht genannt wird, setze das Feld auf null.
"#;

const CLASSIFICATION_OUTRO: &str = r#"
Bestimme zuerst die Kategorie. Suche danach gezielt nach den oben genannten persönlichen Angaben. Achte auf Schlüsselwörter wie "Ratenzahlung", "unterschrieben", "Leistungsbescheid", "Passwort", "Rechnungskopie", "später zahlen", "überwiesen"."#;

const INSTALLMENT_PROMPT: &str = r#"Extrahiere aus der folgenden E-Mail die Angaben für eine Ratenzahlungsanfrage.
E-Mail:
{text}
Extrahiere:
- ratenhoehe: gewünschte monatliche Rate in EUR (z.B. "50 Euro" -> 50.0)
- ratenanzahl: gewünschte Anzahl der Raten (z.B. "6 Monatsraten" -> 6)
- startdatum: gewünschtes Startdatum (z.B. "ab 01.02.2025")
- abbuchungstag: Tag im Monat für die Abbuchung (z.B. "zum 15." -> 15)
Wenn eine Angabe nicht genannt wird, setze null."#;

const INVOICE_COPY_PROMPT: &str = r#"Extrahiere aus der folgenden E-Mail die Angaben für eine Rechnungskopie.
E-Mail:
{text}
Extrahiere:
- anzahl_kopien: Anzahl gewünschter Kopien
- zieladresse: Adresse für den Versand (falls genannt)
- per_email: Soll die Kopie per E-Mail geschickt werden?
Wenn eine Angabe nicht genannt wird, setze null."#;

const PAYMENT_DEFERRAL_PROMPT: &str = r#"Extrahiere aus der folgenden E-Mail die Angaben für einen Zahlungsaufschub.
E-Mail:
{text}
Extrahiere:
- zieldatum: gewünschtes neues Zahlungsziel
- grund: Begründung (z.B. "warte auf Versicherung")
Wenn eine Angabe nicht genannt wird, setze null."#;

/// Categorization prompt over the configured label set.
pub fn classification_prompt(labels: &[Category], email: &str) -> String {
    let mut prompt = String::from(CLASSIFICATION_INTRO);
    for label in labels {
        prompt.push_str(&format!("\"{}\" - {}\n", label.as_str(), label.prompt_hint()));
    }
    prompt.push_str(CLASSIFICATION_EXTRACTION);
    prompt.push_str("---\nE-MAIL ZU KLASSIFIZIEREN:\n");
    prompt.push_str(email);
    prompt.push_str("\n---\n");
    prompt.push_str(CLASSIFICATION_OUTRO);
    prompt
}

pub fn detail_prompt(kind: DetailKind, email: &str) -> String {
    let template = match kind {
        DetailKind::Installment => INSTALLMENT_PROMPT,
        DetailKind::InvoiceCopy => INVOICE_COPY_PROMPT,
        DetailKind::PaymentDeferral => PAYMENT_DEFERRAL_PROMPT,
    };
    template.replace("{text}", email)
}
