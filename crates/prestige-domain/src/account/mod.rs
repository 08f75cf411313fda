use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, UserId};

const MIN_PASSWORD_LEN: usize = 8;
const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=32;

/// Profile of a signed-in user, including both currencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub points: u64,
    pub prestige_tickets: u64,
    pub referral_code: Option<String>,
    pub is_admin: bool,
}

impl UserProfile {
    pub fn with_balances(mut self, points: u64, prestige_tickets: u64) -> Self {
        self.points = points;
        self.prestige_tickets = prestige_tickets;
        self
    }
}

/// Login credentials
///
/// Password is kept out of `Debug` output.
#[derive(Clone, Serialize)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Result<Self, DomainError> {
        let email = validate_email(email)?;
        validate_password(password)?;

        Ok(Self {
            email,
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// New account registration
#[derive(Clone, Serialize)]
pub struct SignupRequest {
    username: String,
    email: String,
    password: String,
    referral_code: Option<String>,
}

impl SignupRequest {
    pub fn new(
        username: &str,
        email: &str,
        password: &str,
        referral_code: Option<&str>,
    ) -> Result<Self, DomainError> {
        let username = username.trim();
        if !USERNAME_LEN.contains(&username.chars().count()) {
            return Err(DomainError::Validation(format!(
                "Username must be {} to {} characters",
                USERNAME_LEN.start(),
                USERNAME_LEN.end()
            )));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::Validation(
                "Username may only contain letters, digits, '_' and '-'".to_string(),
            ));
        }

        let email = validate_email(email)?;

        validate_password(password)?;

        let referral_code = referral_code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string);

        Ok(Self {
            username: username.to_string(),
            email,
            password: password.to_string(),
            referral_code,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn referral_code(&self) -> Option<&str> {
        self.referral_code.as_deref()
    }
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .field("referral_code", &self.referral_code)
            .finish()
    }
}

fn validate_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim();
    let mut parts = email.split('@');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => {
            Ok(email.to_string())
        }
        _ => Err(DomainError::Validation(format!(
            "Invalid email address: '{}'",
            email
        ))),
    }
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_trim_email() {
        let creds = Credentials::new("  ana@example.com ", "hunter22").unwrap();
        assert_eq!(creds.email(), "ana@example.com");
        assert_eq!(creds.password(), "hunter22");
    }

    #[test]
    fn test_credentials_reject_bad_input() {
        assert!(Credentials::new("no-at-sign", "hunter22").is_err());
        assert!(Credentials::new("a@b@c", "hunter22").is_err());
        assert!(Credentials::new("@example.com", "hunter22").is_err());
        assert!(Credentials::new("ana@example.com", "").is_err());
    }

    #[test]
    fn test_credentials_share_signup_password_length() {
        let err = Credentials::new("ana@example.com", "secret").unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref msg) if msg.contains("at least 8")));

        assert!(Credentials::new("ana@example.com", "12345678").is_ok());
        assert!(SignupRequest::new("ana", "ana@example.com", "secret", None).is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("ana@example.com", "hunter22").unwrap();
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("hunter22"));
        assert!(printed.contains("ana@example.com"));
    }

    #[test]
    fn test_signup_validation() {
        assert!(SignupRequest::new("ana_b", "ana@example.com", "longenough", None).is_ok());
        assert!(SignupRequest::new("ab", "ana@example.com", "longenough", None).is_err());
        assert!(SignupRequest::new("ana b", "ana@example.com", "longenough", None).is_err());
        assert!(SignupRequest::new("ana", "ana@example.com", "short", None).is_err());
        assert!(SignupRequest::new("ana", "nope", "longenough", None).is_err());
    }

    #[test]
    fn test_signup_blank_referral_is_dropped() {
        let req = SignupRequest::new("ana", "ana@example.com", "longenough", Some("  ")).unwrap();
        assert_eq!(req.referral_code(), None);

        let req = SignupRequest::new("ana", "ana@example.com", "longenough", Some(" FRIEND1 "))
            .unwrap();
        assert_eq!(req.referral_code(), Some("FRIEND1"));
    }
}
