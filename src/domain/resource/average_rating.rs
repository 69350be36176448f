//! Server-computed average rating.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Aggregate star rating computed by the server (0.0 when unrated).
///
/// The backend serializes this as a decimal string (`"4.10"`); plain JSON
/// numbers are accepted too.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "RawAverage", into = "String")]
pub struct AverageRating(f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAverage {
    Text(String),
    Number(f64),
}

impl AverageRating {
    /// Creates an average, rejecting values outside 0..=5 and non-finite values.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::invalid_format(
                "average_rating",
                "must be a finite number",
            ));
        }
        if !(0.0..=5.0).contains(&value) {
            return Err(ValidationError::invalid_format(
                "average_rating",
                format!("{} is outside 0..=5", value),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<RawAverage> for AverageRating {
    type Error = ValidationError;

    fn try_from(raw: RawAverage) -> Result<Self, Self::Error> {
        match raw {
            RawAverage::Number(value) => Self::new(value),
            RawAverage::Text(text) => {
                let value = text.trim().parse::<f64>().map_err(|_| {
                    ValidationError::invalid_format("average_rating", format!("'{}' is not a number", text))
                })?;
                Self::new(value)
            }
        }
    }
}

impl From<AverageRating> for String {
    fn from(rating: AverageRating) -> Self {
        format!("{:.2}", rating.0)
    }
}

impl fmt::Display for AverageRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
