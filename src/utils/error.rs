use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RelayError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::MalformedPayload { .. } => ErrorCategory::Input,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::HttpError(_) => "HTTP_CLIENT_ERROR",
            Self::IoError(_) => "IO_ERROR",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => "CONFIGURATION_ERROR",
            Self::MalformedPayload { .. } => "MALFORMED_PAYLOAD",
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::HttpError(_) => {
                "Check TLS support and the outbound network of the relay host".to_string()
            }
            Self::IoError(_) => {
                "Check that the listen address is free and the config file is readable"
                    .to_string()
            }
            Self::SerializationError(_) => "Check the payload or config file encoding".to_string(),
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Fix the configuration file or command-line flags and restart".to_string()
            }
            Self::MissingConfigError { field } => format!(
                "Provide '{}' with a command-line flag, an environment variable or the [relay] table",
                field
            ),
            Self::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' and restart", field)
            }
            Self::MalformedPayload { .. } => {
                "Send a request body containing a valid JSON document".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid relay configuration: {}", self),
            ErrorCategory::Input => format!("Rejected inbound webhook: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::System => format!("Relay failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
