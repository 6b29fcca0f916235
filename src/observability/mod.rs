//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, adapter, engine produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (conversion counters and latency histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is attached to every HTTP span
//! - Metrics are recorded through the `metrics` facade and are no-ops until
//!   an exporter is installed

pub mod logging;
pub mod metrics;
