//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Logging → Metrics → Engine → Bind listener → Serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGINT/SIGTERM → Shutdown::trigger → stop accepting → drain → exit
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
