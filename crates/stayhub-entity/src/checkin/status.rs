//! Checkin status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a guest stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "checkin_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CheckinStatus {
    /// The guest is in the unit, original duration.
    Active,
    /// The guest is in the unit and the stay has been extended.
    Extended,
    /// The stay ran to its checkout time and was closed by the scheduler.
    Completed,
    /// The guest left before the checkout time.
    EarlyCheckout,
}

impl CheckinStatus {
    /// Check if the checkin is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::EarlyCheckout)
    }

    /// Check if the guest currently holds the unit.
    pub fn is_in_house(&self) -> bool {
        matches!(self, Self::Active | Self::Extended)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Extended => "extended",
            Self::Completed => "completed",
            Self::EarlyCheckout => "early_checkout",
        }
    }
}

impl fmt::Display for CheckinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_and_in_house_partition_the_states() {
        for status in [
            CheckinStatus::Active,
            CheckinStatus::Extended,
            CheckinStatus::Completed,
            CheckinStatus::EarlyCheckout,
        ] {
            assert_ne!(status.is_terminal(), status.is_in_house());
        }
    }
}
