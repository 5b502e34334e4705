//! Middleware modules

pub mod redact;
pub mod request_log;
