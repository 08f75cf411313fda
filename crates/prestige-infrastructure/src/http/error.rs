use prestige_domain::shared::DomainError;
use reqwest::StatusCode;

/// Failures raised by the HTTP layer before they become domain errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Server rejected the request: {0}")]
    Rejected(String),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 5xx and 429 may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        self.status().is_some_and(|status| {
            status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
        })
    }
}

/// How a 401 should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Login/signup: 401 means the credentials were wrong
    Credentials,
    /// Bearer-token call: 401 means the session is no longer accepted
    Authenticated,
}

/// Translate an HTTP-layer failure into the domain's error vocabulary
pub fn to_domain_error(err: anyhow::Error, kind: CallKind) -> DomainError {
    if let Some(api_err) = err.downcast_ref::<ApiError>() {
        return match api_err {
            ApiError::Status { status, message } => status_to_domain(*status, message, kind),
            ApiError::Rejected(message) => DomainError::Conflict(message.clone()),
            ApiError::Decode(message) => DomainError::Deserialization(message.clone()),
            ApiError::InvalidRecord(message) => DomainError::DataIntegrity(message.clone()),
        };
    }

    if let Some(reqwest_err) = err.downcast_ref::<reqwest::Error>() {
        if reqwest_err.is_timeout() {
            return DomainError::Timeout(reqwest_err.to_string());
        }
        if reqwest_err.is_connect() || reqwest_err.is_request() {
            return DomainError::Network(reqwest_err.to_string());
        }
        if reqwest_err.is_decode() {
            return DomainError::Deserialization(reqwest_err.to_string());
        }
    }

    DomainError::Infrastructure(format!("{:#}", err))
}

fn status_to_domain(status: StatusCode, message: &str, kind: CallKind) -> DomainError {
    let message = message.to_string();

    match status {
        StatusCode::UNAUTHORIZED => match kind {
            CallKind::Credentials => DomainError::InvalidCredentials(message),
            CallKind::Authenticated => DomainError::ExpiredSession(message),
        },
        StatusCode::FORBIDDEN => DomainError::Forbidden(message),
        StatusCode::NOT_FOUND => DomainError::NotFound(message),
        StatusCode::CONFLICT => DomainError::Conflict(message),
        StatusCode::TOO_MANY_REQUESTS => DomainError::ExternalService(message),
        s if s.is_server_error() => DomainError::ExternalService(message),
        s if s.is_client_error() => DomainError::Validation(message),
        _ => DomainError::Infrastructure(format!("unexpected status {}: {}", status, message)),
    }
}
