use prestige_domain::shared::{DomainError, ErrorCode, ErrorSeverity};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Failure of a CLI command, printed on stderr
///
/// `--json` prints this struct as-is so scripts can branch on `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandError {
    pub code: u16,
    pub message: String,
    pub severity: ErrorSeverity,
    /// Running the same command again may succeed
    pub recoverable: bool,
    /// Suggested next step for the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CommandError {
    pub fn from_code(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: error_code.code(),
            message: message.into(),
            severity: error_code.severity(),
            recoverable: error_code.is_recoverable(),
            hint: hint_for(error_code).map(str::to_string),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::InfrastructureError, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::InvalidInput, message)
    }

    /// Process exit status: 3 for auth, 2 for anything the user can fix
    /// (missing resource, rule violation, bad input), 1 for outages.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            1000..=1999 => 3,
            2000..=3999 | 6000..=6999 => 2,
            _ => 1,
        }
    }

    /// Point at the log files for failures the user cannot fix themselves
    pub fn with_log_hint(mut self, log_dir: Option<&Path>) -> Self {
        match log_dir {
            Some(dir) if self.hint.is_none() && self.severity == ErrorSeverity::Error => {
                self.hint = Some(format!("details are in the logs under {}", dir.display()));
            }
            _ => {}
        }
        self
    }

    /// Text written to stderr for a failed command
    pub fn report(&self, json: bool) -> String {
        if json {
            if let Ok(body) = serde_json::to_string_pretty(self) {
                return body;
            }
        }

        match &self.hint {
            Some(hint) => format!("Error: {}\n  hint: {}", self, hint),
            None => format!("Error: {}", self),
        }
    }
}

fn hint_for(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::InvalidCredentials => Some("check --email and --password"),
        ErrorCode::ExpiredSession | ErrorCode::Unauthenticated => {
            Some("sign in again with --email and --password, or pass a fresh --token")
        }
        ErrorCode::InsufficientTickets => Some("convert points into tickets with `prestige convert`"),
        ErrorCode::AlreadyClaimed => Some("the next reward unlocks at midnight UTC"),
        ErrorCode::NetworkError | ErrorCode::TimeoutError | ErrorCode::ExternalServiceError => {
            Some("the service may be unavailable, try again shortly")
        }
        _ => None,
    }
}

impl From<DomainError> for CommandError {
    fn from(err: DomainError) -> Self {
        Self::from_code(err.code(), err.message())
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(err) => Self::infrastructure(format!("{:#}", err)),
        }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::from_code(ErrorCode::SerializationError, err.to_string())
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}
