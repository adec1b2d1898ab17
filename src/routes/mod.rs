pub mod case_status;
