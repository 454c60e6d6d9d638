pub mod redaction;

pub use redaction::redact_sensitive_errors;
