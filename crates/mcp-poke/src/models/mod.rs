//! Data models for mcp-poke

mod level;
mod request;

pub use level::*;
pub use request::*;
