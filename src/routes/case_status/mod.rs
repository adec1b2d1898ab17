mod handler;

pub use handler::{get_case_status, test_connection};
