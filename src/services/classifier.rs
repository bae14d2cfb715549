use crate::errors::Result;
use crate::models::{
    ClassificationResponse, ClassificationResult, DetailExtraction, DetailKind,
    InstallmentRequest, InvoiceCopyRequest, PaymentDeferralRequest,
};
use crate::services::ai::prompts::{classification_prompt, detail_prompt};
use crate::services::ai::structured::generate_structured;
use crate::services::ai::LlmProvider;
use crate::services::customer_number::extract_customer_number;
use crate::state::AppState;

/// Classifies one email and extracts its entities.
///
/// Never fails: a failed categorization call yields the catch-all result
/// with the error recorded, and a failed detail call only omits `details`.
pub async fn classify(state: &AppState, text: &str) -> ClassificationResult {
    let customer_number = extract_customer_number(text);

    let prompt = classification_prompt(&state.labels, text);
    let response =
        match generate_structured::<ClassificationResponse>(state.llm.as_ref(), &prompt).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "classification failed, using fallback category");
                return ClassificationResult::fallback(customer_number, e.to_string());
            }
        };

    let details = match response.category.detail_kind() {
        Some(kind) => match extract_details(state.llm.as_ref(), kind, text).await {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    category = %response.category,
                    "detail extraction failed"
                );
                None
            }
        },
        None => None,
    };

    tracing::debug!(
        category = %response.category,
        has_details = details.is_some(),
        has_customer_number = !customer_number.is_empty(),
        "classified email"
    );

    ClassificationResult::from_response(response, customer_number, details)
}

async fn extract_details(
    llm: &dyn LlmProvider,
    kind: DetailKind,
    text: &str,
) -> Result<DetailExtraction> {
    let prompt = detail_prompt(kind, text);
    let details = match kind {
        DetailKind::Installment => {
            DetailExtraction::Installment(generate_structured::<InstallmentRequest>(llm, &prompt).await?)
        }
        DetailKind::InvoiceCopy => {
            DetailExtraction::InvoiceCopy(generate_structured::<InvoiceCopyRequest>(llm, &prompt).await?)
        }
        DetailKind::PaymentDeferral => DetailExtraction::PaymentDeferral(
            generate_structured::<PaymentDeferralRequest>(llm, &prompt).await?,
        ),
    };
    Ok(details.normalized())
}
