// Status line state.
// Transient one-line messages shown under the weather card.

use chrono::{DateTime, Utc};

/// Status message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Error,
}

/// A message for the status line.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub level: StatusLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusLine {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::info("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let info = StatusLine::info("Loading weather for Tashkent...");
        assert_eq!(info.level, StatusLevel::Info);
        assert!(!info.is_error());

        let error = StatusLine::error("No data available.");
        assert!(error.is_error());
        assert_eq!(error.message, "No data available.");
    }
}
