mod case_status;
mod token;

pub use case_status::{CaseStatusGateway, SAMPLE_RECEIPT_NUMBER};
pub use token::{DEFAULT_EXPIRES_IN_SECS, SAFETY_MARGIN_MS, TokenProvider, TokenResponse};
