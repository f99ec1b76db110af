use thiserror::Error;

/// Banner text for transport failures.
pub const CONNECT_FAILED_MESSAGE: &str =
    "Unable to connect to the server. Please check your connection and retry.";

/// Banner text for backend failures that carry no message of their own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum SmError {
    /// An error occurred during an HTTP request (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A JSON document could not be parsed or serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local durable storage could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The backend rejected the credential (HTTP 401 or an explicit "unauthorized" payload).
    /// The session has already been invalidated when this is returned.
    #[error("unauthorized at {url}")]
    Unauthorized {
        /// The URL that rejected the request.
        url: String,
    },

    /// The backend answered but reported a business failure (`status != "success"`).
    #[error("backend failure: {}", .message.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    Backend {
        /// The backend-supplied message, when present.
        message: Option<String>,
    },

    /// Client-side form validation failed; no request was sent.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The offending form field.
        field: &'static str,
        /// A user-facing explanation.
        message: String,
    },

    /// The data received from the API was in an unexpected format or was missing a required field.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    /// An invalid date range was provided for a feed request (from must not be after to).
    #[error("invalid date range: from must not be after to")]
    InvalidDates,
}

/// Coarse classification of failures, mirroring how a view reacts to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failure: show "unable to connect" with a manual retry.
    Network,
    /// Credential rejected: forced logout, no retry.
    Unauthorized,
    /// Form input rejected before any request was sent.
    Validation,
    /// Backend-reported failure: show the backend's message.
    Backend,
    /// Payload could not be understood.
    Data,
}

impl SmError {
    /// Classifies the error for display and recovery purposes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SmError::Http(_) | SmError::Status { .. } => ErrorKind::Network,
            SmError::Unauthorized { .. } => ErrorKind::Unauthorized,
            SmError::Validation { .. } | SmError::InvalidDates => ErrorKind::Validation,
            SmError::Backend { .. } => ErrorKind::Backend,
            SmError::Url(_) | SmError::Json(_) | SmError::Io(_) | SmError::Data(_) => {
                ErrorKind::Data
            }
        }
    }

    /// Whether a manual retry action makes sense for this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network | ErrorKind::Data)
    }

    /// The inline message a view should show for this failure.
    pub fn user_message(&self) -> String {
        match self {
            SmError::Backend { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string(),
            SmError::Validation { message, .. } => message.clone(),
            SmError::Unauthorized { .. } => "Your session has expired. Please log in again.".into(),
            SmError::InvalidDates => "The start date must not be after the end date.".into(),
            SmError::Http(_) | SmError::Status { .. } => CONNECT_FAILED_MESSAGE.to_string(),
            SmError::Url(_) | SmError::Json(_) | SmError::Io(_) | SmError::Data(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }

    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        SmError::Validation {
            field,
            message: message.into(),
        }
    }
}
