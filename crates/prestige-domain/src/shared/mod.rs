use serde::{Deserialize, Serialize};

mod clock;
pub use clock::{Clock, FixedClock, SystemClock};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn from_string(s: &str) -> Self {
                Self(s.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(UserId);
define_id!(CompetitionId);

/// Error codes for structured error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1xxx)
    InvalidCredentials = 1001,
    ExpiredSession = 1002,
    Unauthenticated = 1003,
    Forbidden = 1004,

    // Resource Not Found (2xxx)
    NotFound = 2001,
    CompetitionNotFound = 2002,

    // Business Logic (3xxx)
    CompetitionClosed = 3001,
    AlreadyEntered = 3002,
    InsufficientTickets = 3003,
    InsufficientPoints = 3004,
    AlreadyClaimed = 3005,
    Conflict = 3006,

    // Data (4xxx)
    SerializationError = 4001,
    DataIntegrityError = 4002,

    // Infrastructure (5xxx)
    InfrastructureError = 5001,
    NetworkError = 5002,
    TimeoutError = 5003,
    ExternalServiceError = 5004,

    // Validation (6xxx)
    ValidationError = 6001,
    InvalidInput = 6002,
}

impl ErrorCode {
    /// Get error code as integer
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErrorCode::InvalidCredentials
            | ErrorCode::ExpiredSession
            | ErrorCode::Unauthenticated
            | ErrorCode::NetworkError
            | ErrorCode::TimeoutError => ErrorSeverity::Warning,

            ErrorCode::NotFound
            | ErrorCode::CompetitionNotFound
            | ErrorCode::CompetitionClosed
            | ErrorCode::AlreadyEntered
            | ErrorCode::InsufficientTickets
            | ErrorCode::InsufficientPoints
            | ErrorCode::AlreadyClaimed
            | ErrorCode::ValidationError
            | ErrorCode::InvalidInput => ErrorSeverity::Info,

            ErrorCode::DataIntegrityError
            | ErrorCode::SerializationError
            | ErrorCode::InfrastructureError => ErrorSeverity::Error,

            _ => ErrorSeverity::Warning,
        }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorCode::NetworkError | ErrorCode::TimeoutError | ErrorCode::ExternalServiceError
        )
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Session expired: {0}")]
    ExpiredSession(String),

    #[error("Not logged in: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Competition not found: {0}")]
    CompetitionNotFound(String),

    #[error("Competition closed: {0}")]
    CompetitionClosed(String),

    #[error("Already entered: {0}")]
    AlreadyEntered(String),

    #[error("Insufficient tickets: {0}")]
    InsufficientTickets(String),

    #[error("Insufficient points: {0}")]
    InsufficientPoints(String),

    #[error("Already claimed: {0}")]
    AlreadyClaimed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl DomainError {
    /// Get error code
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::InvalidCredentials(_) => ErrorCode::InvalidCredentials,
            DomainError::ExpiredSession(_) => ErrorCode::ExpiredSession,
            DomainError::Unauthenticated(_) => ErrorCode::Unauthenticated,
            DomainError::Forbidden(_) => ErrorCode::Forbidden,
            DomainError::NotFound(_) => ErrorCode::NotFound,
            DomainError::CompetitionNotFound(_) => ErrorCode::CompetitionNotFound,
            DomainError::CompetitionClosed(_) => ErrorCode::CompetitionClosed,
            DomainError::AlreadyEntered(_) => ErrorCode::AlreadyEntered,
            DomainError::InsufficientTickets(_) => ErrorCode::InsufficientTickets,
            DomainError::InsufficientPoints(_) => ErrorCode::InsufficientPoints,
            DomainError::AlreadyClaimed(_) => ErrorCode::AlreadyClaimed,
            DomainError::Conflict(_) => ErrorCode::Conflict,
            DomainError::Network(_) => ErrorCode::NetworkError,
            DomainError::Timeout(_) => ErrorCode::TimeoutError,
            DomainError::ExternalService(_) => ErrorCode::ExternalServiceError,
            DomainError::Infrastructure(_) => ErrorCode::InfrastructureError,
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::InvalidInput(_) => ErrorCode::InvalidInput,
            DomainError::DataIntegrity(_) => ErrorCode::DataIntegrityError,
            DomainError::Deserialization(_) => ErrorCode::SerializationError,
        }
    }

    /// Get error message
    pub fn message(&self) -> &str {
        match self {
            DomainError::InvalidCredentials(msg)
            | DomainError::ExpiredSession(msg)
            | DomainError::Unauthenticated(msg)
            | DomainError::Forbidden(msg)
            | DomainError::NotFound(msg)
            | DomainError::CompetitionNotFound(msg)
            | DomainError::CompetitionClosed(msg)
            | DomainError::AlreadyEntered(msg)
            | DomainError::InsufficientTickets(msg)
            | DomainError::InsufficientPoints(msg)
            | DomainError::AlreadyClaimed(msg)
            | DomainError::Conflict(msg)
            | DomainError::Network(msg)
            | DomainError::Timeout(msg)
            | DomainError::ExternalService(msg)
            | DomainError::Infrastructure(msg)
            | DomainError::Validation(msg)
            | DomainError::InvalidInput(msg)
            | DomainError::DataIntegrity(msg)
            | DomainError::Deserialization(msg) => msg,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        self.code().severity()
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        self.code().is_recoverable()
    }

    /// Format error with code
    pub fn format_with_code(&self) -> String {
        format!("[{}] {}", self.code().code(), self)
    }
}
