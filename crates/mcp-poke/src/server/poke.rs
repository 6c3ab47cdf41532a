//! The `poke` tool

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Level, PokeArgs};
use crate::notifier::Notifier;

use super::protocol::ToolDefinition;

/// Validates `poke` calls and hands them to the notifier
#[derive(Debug, Clone)]
pub struct PokeTool {
    config: Arc<Config>,
    notifier: Arc<Notifier>,
}

impl PokeTool {
    /// Tool name
    pub const NAME: &'static str = "poke";

    /// Description advertised to clients
    pub const DESCRIPTION: &'static str = "Send a desktop notification to communicate with the user. \
        Use for task completions, errors, warnings, or whenever you need the user's attention \
        while they may be working in another application.";

    /// Create the tool
    pub fn new(config: Arc<Config>, notifier: Arc<Notifier>) -> Self {
        Self { config, notifier }
    }

    /// Tool definition for `tools/list`
    pub fn definition() -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: Self::DESCRIPTION.to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "The notification message text"
                    },
                    "title": {
                        "type": "string",
                        "description": "The notification title"
                    },
                    "level": {
                        "type": "string",
                        "description": "Severity level: info, warning, error, or success",
                        "enum": Level::names()
                    }
                },
                "required": ["message"]
            }),
        }
    }

    /// Decode raw call arguments and handle them
    pub async fn call(&self, arguments: Value) -> Result<String> {
        let args: PokeArgs = serde_json::from_value(arguments)
            .map_err(|e| Error::invalid_argument(format!("invalid arguments: {e}")))?;
        self.handle_poke(args).await
    }

    /// Validate a poke request, send it, and describe the outcome
    pub async fn handle_poke(&self, args: PokeArgs) -> Result<String> {
        let verbose = self.config.verbose();

        let request = match args.normalize() {
            Ok(request) => request,
            Err(e) => {
                if verbose {
                    info!(error = %e, "[MCP Server] Parameter validation error");
                }
                return Err(e);
            }
        };

        if verbose {
            info!(
                title = %request.title,
                message = %request.message,
                level = %request.level,
                "[MCP Server] Received poke request"
            );
        }

        if let Err(e) = self
            .notifier
            .send(&request.title, &request.message, request.level)
            .await
        {
            if verbose {
                info!(error = %e, "[MCP Server] Notification failed");
            }
            return Err(e);
        }

        if verbose {
            info!("[MCP Server] Notification sent successfully");
        }

        Ok(request.confirmation())
    }
}
