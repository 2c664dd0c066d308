//! Error types for kgterms

use thiserror::Error;

/// Result type alias using kgterms' Error
pub type Result<T> = std::result::Result<T, Error>;

/// kgterms error types with helpful messages
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (E001-E099)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors (E100-E199)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Network errors (E200-E299)
    #[error("Network error: {0}. Check your internet connection.")]
    NetworkError(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    ProviderError(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E001",
            Self::ConfigError(_) => "E100",
            Self::NetworkError(_) => "E200",
            Self::ProviderError(_) => "E201",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ConfigError(_) => {
                Some("Set the GOOGLE_API_KEY environment variable".to_string())
            }
            Self::NetworkError(_) => Some("Check internet connection".to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::InvalidInput("bad".into()).code(), "E001");
        assert_eq!(Error::ConfigError("no key".into()).code(), "E100");
        assert_eq!(Error::ProviderError("boom".into()).code(), "E201");
        assert_eq!(Error::Other("misc".into()).code(), "E9999");
    }

    #[test]
    fn test_config_error_suggestion() {
        let err = Error::ConfigError("missing credential".into());
        assert!(err.suggestion().unwrap().contains("GOOGLE_API_KEY"));
        assert!(Error::InvalidInput("x".into()).suggestion().is_none());
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("not a JSON object".into());
        assert_eq!(err.to_string(), "Invalid input: not a JSON object");
    }
}
