mod case_status;
mod connection;
mod receipt;

pub use case_status::{CaseStatus, HistoryEntry, Normalized, NormalizedCaseStatus, normalize};
pub use connection::{ConnectionReport, ReportedStatus};
pub use receipt::ReceiptNumber;
