//! Poke tool arguments

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::level::Level;

/// Title used when the caller leaves it out
pub const DEFAULT_TITLE: &str = "Notification";

/// Arguments of a `poke` call, as sent by the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokeArgs {
    /// Notification body
    pub message: String,
    /// Notification title
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Severity level name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub level: String,
}

impl PokeArgs {
    /// Build arguments from their three parts
    pub fn new(
        message: impl Into<String>,
        title: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            title: title.into(),
            level: level.into(),
        }
    }

    /// Validate the arguments and fill in defaults
    pub fn normalize(self) -> Result<PokeRequest> {
        if self.message.is_empty() {
            return Err(Error::invalid_argument("message cannot be empty"));
        }

        let title = if self.title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            self.title
        };

        let level = if self.level.is_empty() {
            Level::default()
        } else {
            self.level.parse()?
        };

        Ok(PokeRequest {
            message: self.message,
            title,
            level,
        })
    }
}

/// A validated notification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokeRequest {
    /// Non-empty notification body
    pub message: String,
    /// Notification title
    pub title: String,
    /// Severity level
    pub level: Level,
}

impl PokeRequest {
    /// Confirmation returned to the caller once delivered
    pub fn confirmation(&self) -> String {
        format!(
            "Notification sent: {} - {} [{}]",
            self.title, self.message, self.level
        )
    }
}
