use std::fmt;

/// Errors raised by the lead client.
#[derive(Debug)]
pub enum LeadError {
    /// A token required for the call was not configured.
    NotConfigured(String),
    /// A required call argument was missing or invalid.
    InvalidArgument(String),
    /// The TCP connection to the API host could not be established.
    Connection {
        /// Target URL of the failed request (private token redacted).
        url: String,
        /// Underlying error message.
        message: String,
    },
    /// The HTTP client could not be built or a URL could not be parsed.
    Transport(String),
    /// The payload could not be serialized to JSON.
    Serialization(serde_json::Error),
}

impl fmt::Display for LeadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadError::NotConfigured(msg) => write!(f, "Not configured: {}", msg),
            LeadError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            LeadError::Connection { url, message } => {
                write!(f, "Connection to {} failed: {}", url, message)
            }
            LeadError::Transport(msg) => write!(f, "Transport error: {}", msg),
            LeadError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for LeadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeadError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LeadError {
    /// Converts a `serde_json::Error` into a `LeadError`.
    fn from(err: serde_json::Error) -> Self {
        LeadError::Serialization(err)
    }
}

impl From<url::ParseError> for LeadError {
    /// Converts a `url::ParseError` into a `LeadError`.
    fn from(err: url::ParseError) -> Self {
        LeadError::Transport(format!("Invalid URL: {}", err))
    }
}

impl LeadError {
    /// True for the configuration error kind.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, LeadError::NotConfigured(_))
    }

    /// True for the invalid argument error kind.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, LeadError::InvalidArgument(_))
    }

    /// True when the connection could not be established.
    pub fn is_connection(&self) -> bool {
        matches!(self, LeadError::Connection { .. })
    }
}
