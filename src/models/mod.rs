pub mod category;
pub mod classification;
pub mod dataset;
pub mod details;

pub use category::{shorten_label, Category, DetailKind};
pub use classification::{ClassificationResponse, ClassificationResult};
pub use dataset::EmailRecord;
pub use details::{DetailExtraction, InstallmentRequest, InvoiceCopyRequest, PaymentDeferralRequest};
