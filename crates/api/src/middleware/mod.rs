//! HTTP middleware.

pub mod response_log;

pub use response_log::log_error_responses;
