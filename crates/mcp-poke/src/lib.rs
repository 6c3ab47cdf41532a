//! # mcp-poke
//!
//! MCP server that lets an AI agent poke the user with a desktop notification.
//!
//! The server exposes a single tool, `poke`, over stdio. Each call is
//! validated, handed to a notifier, and answered with a confirmation.
//!
//! ## Architecture
//!
//! - **Config**: YAML configuration with built-in defaults
//! - **Notifier**: desktop delivery through `notify-rust`, or dry-run logging
//! - **Server**: line-delimited JSON-RPC on stdin/stdout and the `poke` tool
//!
//! ## Quick Start
//!
//! ```bash
//! # Register with an MCP client, or try it without a desktop
//! mcp-desktop-notification --dry-run --verbose
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::notifier::{NotificationBackend, Notifier};
    pub use crate::server::{McpServer, PokeTool};
}
