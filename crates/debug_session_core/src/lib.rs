//! Debug Session Core
//!
//! Client side of an interactive, step-through debugging session driven
//! against a remote debug-adapter server over HTTP. Provides the transport
//! (one call per protocol operation), the stateful session controller that
//! presentation code drives, and the breakpoint reconciliation between them.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod ops;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use client::DebugClient;
pub use config::DebugConfig;
pub use controller::{ControllerState, ControllerStatus, SessionController};
pub use error::{DebugError, TransportError};
pub use transport::SessionTransport;

/// Result type alias using TransportError
pub type Result<T> = std::result::Result<T, TransportError>;
