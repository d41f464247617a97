use thiserror::Error;

/// Error types for Portalnesia utilities
#[derive(Error, Debug)]
pub enum UtilsError {
    // URL errors
    #[error("Invalid url: {input}")]
    InvalidUrl { input: String },

    #[error("URL parsing failed: {0}")]
    UrlParse(#[from] url::ParseError),

    // Date errors
    #[error("Unable to parse date: {input}")]
    DateParse { input: String },

    #[error("Invalid date: {message}")]
    InvalidDate { message: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl UtilsError {
    /// Create an invalid url error
    pub fn invalid_url(input: impl Into<String>) -> Self {
        Self::InvalidUrl { input: input.into() }
    }

    /// Create a date parse error
    pub fn date_parse(input: impl Into<String>) -> Self {
        Self::DateParse { input: input.into() }
    }

    /// Create an invalid date error
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate { message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } | Self::UrlParse(_) => "url",
            Self::DateParse { .. } | Self::InvalidDate { .. } => "date",
            Self::Configuration { .. } => "configuration",
        }
    }
}

/// Result type alias for Portalnesia utilities
pub type UtilsResult<T> = std::result::Result<T, UtilsError>;
