//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, tracing, body limit)
//!     → handlers.rs (health, landing page, URL and upload conversion)
//!     → response.rs (Markdown bodies, error → status + {"detail"})
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{ErrorBody, Markdown};
pub use server::{AppState, HttpServer};
