//! Configuration validation.
//!
//! Returns all validation errors, not just the first. Runs before the config
//! is accepted into the system.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("limits.max_upload_bytes must be greater than zero")]
    ZeroUploadLimit,

    #[error("limits.max_request_bytes ({request}) must be at least limits.max_upload_bytes ({upload})")]
    RequestLimitBelowUpload { request: usize, upload: usize },

    #[error("converter.user_agent must not be empty")]
    EmptyUserAgent,

    #[error("converter.fetch_timeout_secs must be greater than zero when set")]
    ZeroFetchTimeout,

    #[error("converter.max_fetch_bytes must be greater than zero")]
    ZeroFetchLimit,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let limits = &config.limits;
    if limits.max_upload_bytes == 0 {
        errors.push(ValidationError::ZeroUploadLimit);
    }
    if limits.max_request_bytes < limits.max_upload_bytes {
        errors.push(ValidationError::RequestLimitBelowUpload {
            request: limits.max_request_bytes,
            upload: limits.max_upload_bytes,
        });
    }

    let converter = &config.converter;
    if converter.user_agent.trim().is_empty() {
        errors.push(ValidationError::EmptyUserAgent);
    }
    if converter.fetch_timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroFetchTimeout);
    }
    if converter.max_fetch_bytes == 0 {
        errors.push(ValidationError::ZeroFetchLimit);
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
