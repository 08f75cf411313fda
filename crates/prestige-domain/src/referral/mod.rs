use serde::{Deserialize, Serialize};
use url::Url;

use crate::shared::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralSummary {
    pub code: String,
    pub referred_count: u32,
    pub points_earned: u64,
}

/// Signup URL carrying the referral code as `?ref=`
pub fn referral_link(signup_url: &str, code: &str) -> Result<String, DomainError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(DomainError::Validation(
            "Referral code cannot be empty".to_string(),
        ));
    }

    let mut url = Url::parse(signup_url)
        .map_err(|e| DomainError::InvalidInput(format!("signup url '{}': {}", signup_url, e)))?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "ref")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("ref", code);

    Ok(url.to_string())
}
