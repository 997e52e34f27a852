//! Error types and handling for the weatherboard pipeline

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the weatherboard pipeline
#[derive(Error, Debug)]
pub enum WeatherBoardError {
    /// Malformed input, e.g. non-numeric coordinates or an empty search
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A place could not be turned into coordinates
    #[error("Could not resolve '{place}': {message}")]
    Resolution { place: String, message: String },

    /// A provider call failed, timed out or returned unusable data
    #[error("Upstream error from {provider}: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Chart rendering errors
    #[error("Chart rendering failed: {message}")]
    Render { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Coarse error category handed to presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadInput,
    ResolutionFailed,
    UpstreamUnavailable,
    Internal,
}

impl WeatherBoardError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new resolution error for `place`
    pub fn resolution<P: Into<String>, S: Into<String>>(place: P, message: S) -> Self {
        Self::Resolution {
            place: place.into(),
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(provider: &'static str, message: S) -> Self {
        Self::Upstream {
            provider,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new rendering error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::BadInput,
            Self::Resolution { .. } => ErrorKind::ResolutionFailed,
            Self::Upstream { .. } => ErrorKind::UpstreamUnavailable,
            Self::Config { .. } | Self::Render { .. } | Self::Io { .. } => ErrorKind::Internal,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => format!("Invalid input: {message}"),
            Self::Resolution { place, .. } => {
                format!("Could not find a location matching '{place}'.")
            }
            Self::Upstream { .. } => {
                "The weather service is unavailable right now. Please try again later."
                    .to_string()
            }
            Self::Config { .. } => {
                "Configuration error. Please check the provider URLs and API keys.".to_string()
            }
            Self::Render { .. } | Self::Io { .. } => {
                "Something went wrong while preparing the weather report.".to_string()
            }
        }
    }
}
