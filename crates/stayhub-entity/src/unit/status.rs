//! Unit status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cached occupancy status of a unit.
///
/// This is a projection derived from checkin history and the cleaning
/// timer; it is only ever written through guarded compare-and-set updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "unit_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    /// Ready for a new checkin.
    Available,
    /// An active or extended checkin holds the unit.
    Occupied,
    /// Post-checkout cleaning is in progress (bounded timer).
    Cleaning,
    /// Taken out of rotation by an operator; never touched automatically.
    Maintenance,
}

impl UnitStatus {
    /// Whether automatic transitions are allowed to touch this status.
    ///
    /// `Maintenance` is entered and left exclusively by operator action.
    pub fn is_automatable(&self) -> bool {
        !matches!(self, Self::Maintenance)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Cleaning => "cleaning",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintenance_is_never_automatable() {
        assert!(!UnitStatus::Maintenance.is_automatable());
        assert!(UnitStatus::Available.is_automatable());
        assert!(UnitStatus::Occupied.is_automatable());
        assert!(UnitStatus::Cleaning.is_automatable());
    }
}
