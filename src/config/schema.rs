//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::upload::DEFAULT_MAX_UPLOAD_BYTES;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Request and upload size limits.
    pub limits: LimitsConfig,

    /// Conversion engine settings.
    pub converter: ConverterConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

impl ListenerConfig {
    /// Replace the host and/or port part of the bind address.
    pub fn apply_overrides(&mut self, host: Option<&str>, port: Option<u16>) {
        if host.is_none() && port.is_none() {
            return;
        }

        let (current_host, current_port) = match self.bind_address.rsplit_once(':') {
            Some((h, p)) => (h.to_string(), p.to_string()),
            None => (self.bind_address.clone(), "8000".to_string()),
        };
        let host = host.map(str::to_string).unwrap_or(current_host);
        let port = port.map(|p| p.to_string()).unwrap_or(current_port);

        self.bind_address = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        };
    }
}

/// Size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Uploads larger than this many bytes are rejected.
    pub max_upload_bytes: usize,

    /// Maximum request body size in bytes, multipart framing included.
    /// Kept above `max_upload_bytes` so oversized uploads get a 413 with detail.
    pub max_request_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_request_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Conversion engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// User-Agent sent when fetching URLs.
    pub user_agent: String,

    /// Timeout for fetching a URL, in seconds. Unbounded when unset.
    pub fetch_timeout_secs: Option<u64>,

    /// Maximum size of a fetched document in bytes.
    pub max_fetch_bytes: usize,

    /// Directory for staged uploads (system temp dir when unset).
    pub temp_dir: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("markit/", env!("CARGO_PKG_VERSION")).to_string(),
            fetch_timeout_secs: None,
            max_fetch_bytes: 50 * 1024 * 1024,
            temp_dir: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive, used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "markit=info,tower_http=info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
