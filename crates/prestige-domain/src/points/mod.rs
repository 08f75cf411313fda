use serde::{Deserialize, Serialize};

use crate::shared::DomainError;

/// Request to convert points into prestige tickets. The exchange rate is
/// applied server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsConversion {
    points: u64,
}

impl PointsConversion {
    pub fn new(points: u64, available: u64) -> Result<Self, DomainError> {
        if points == 0 {
            return Err(DomainError::Validation(
                "Conversion amount must be positive".to_string(),
            ));
        }

        if points > available {
            return Err(DomainError::InsufficientPoints(format!(
                "requested {} points, {} available",
                points, available
            )));
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> u64 {
        self.points
    }
}

/// Balances after a conversion, as returned by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub points: u64,
    pub prestige_tickets: u64,
}
