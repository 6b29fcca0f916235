//! MarkIt: convert URLs and uploaded files to Markdown over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /convert?url=..   ┌──────────┐    ┌──────────┐    ┌─────────┐    ┌──────────────┐
//!     GET /convert/{*url} ─▶│   http   │───▶│ validate │───▶│ adapter │───▶│   convert    │
//!                           │  router  │    └──────────┘    │         │    │ (engine)     │
//!     POST /convert ───────▶│          │───▶┌──────────┐───▶│         │    │ fetch/format │
//!                           └──────────┘    │  upload  │    └─────────┘    └──────────────┘
//!                                           │ temp file│
//!                                           └──────────┘
//! ```
//!
//! Cross-cutting: `config` (TOML), `observability` (tracing, metrics),
//! `lifecycle` (signals, shutdown).

pub mod adapter;
pub mod config;
pub mod convert;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upload;
pub mod validate;

pub use adapter::{ConversionAdapter, Source};
pub use config::ServiceConfig;
pub use convert::{ConversionOutput, ConverterError, DocumentConverter, MarkdownEngine};
pub use error::{ConvertError, Subject};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use upload::UploadHandler;
pub use validate::{validate_url, ValidUrl};
