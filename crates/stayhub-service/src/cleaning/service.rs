//! Cleaning timer: bounded countdown with a hard extension ceiling.
//!
//! A unit entering `Cleaning` gets the base budget (30 minutes by
//! default). Extensions are capped both per call and cumulatively at the
//! configured maximum; the counter write is a compare-and-set on the
//! previous value so concurrent extends cannot add up past the ceiling.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stayhub_core::clock::Clock;
use stayhub_core::config::cleaning::CleaningConfig;
use stayhub_core::error::AppError;
use stayhub_core::result::AppResult;
use stayhub_entity::actor::Actor;
use stayhub_entity::unit::{Unit, UnitStatus};

use crate::store::UnitStore;
use crate::unit::UnitStatusProjector;

/// Derived view of a unit's cleaning countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningStatus {
    /// Whether the unit is currently in cleaning.
    pub in_cleaning: bool,
    /// When the current cycle started.
    pub started_at: Option<DateTime<Utc>>,
    /// Minutes elapsed since the cycle started.
    pub elapsed_minutes: i64,
    /// Minutes remaining; negative means overtime.
    pub remaining_minutes: i64,
    /// Cumulative extension granted this cycle.
    pub extended_minutes: i64,
    /// Whether further extension is allowed.
    pub can_extend: bool,
    /// Whether the budget has already elapsed.
    pub overtime: bool,
}

impl CleaningStatus {
    fn idle() -> Self {
        Self {
            in_cleaning: false,
            started_at: None,
            elapsed_minutes: 0,
            remaining_minutes: 0,
            extended_minutes: 0,
            can_extend: false,
            overtime: false,
        }
    }
}

/// Cleaning timer service.
#[derive(Debug, Clone)]
pub struct CleaningService {
    units: Arc<dyn UnitStore>,
    projector: Arc<UnitStatusProjector>,
    config: CleaningConfig,
    clock: Arc<dyn Clock>,
}

impl CleaningService {
    /// Create a new cleaning service.
    pub fn new(
        units: Arc<dyn UnitStore>,
        projector: Arc<UnitStatusProjector>,
        config: CleaningConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            units,
            projector,
            config,
            clock,
        }
    }

    /// Extend the current cleaning cycle by `additional_minutes`.
    ///
    /// Fails with `ExtendTooLarge` when the single call exceeds the
    /// maximum and with `CumulativeLimitExceeded` when the cycle total
    /// would; in both cases state is unchanged.
    pub async fn extend_cleaning(
        &self,
        unit_id: Uuid,
        additional_minutes: i64,
        user_id: Uuid,
    ) -> AppResult<CleaningStatus> {
        if additional_minutes < 1 {
            return Err(AppError::validation("extension must be at least one minute"));
        }
        if additional_minutes > self.config.max_extension_minutes {
            return Err(AppError::extend_too_large(format!(
                "Cleaning can be extended by at most {} minutes per cycle",
                self.config.max_extension_minutes
            )));
        }

        let unit = self.get_required(unit_id).await?;
        if unit.status != UnitStatus::Cleaning {
            return Err(AppError::validation(format!(
                "Unit {} is not in cleaning",
                unit.unit_number
            )));
        }

        let current = i64::from(unit.cleaning_extended_minutes);
        let requested_total = current + additional_minutes;
        if requested_total > self.config.max_extension_minutes {
            return Err(AppError::cumulative_limit_exceeded(format!(
                "Cleaning already extended by {} of {} minutes",
                current, self.config.max_extension_minutes
            )));
        }

        let applied = self
            .units
            .update_cleaning_extension_guarded(
                unit_id,
                unit.cleaning_extended_minutes,
                requested_total as i32,
            )
            .await?;
        if !applied {
            return Err(AppError::conflict(
                "Cleaning timer changed concurrently; retry with fresh state",
            ));
        }

        tracing::info!(
            %unit_id,
            user_id = %user_id,
            additional_minutes,
            total_extended = requested_total,
            "cleaning extended"
        );

        self.cleaning_status(unit_id).await
    }

    /// Finish cleaning manually, returning the unit to `Available`.
    pub async fn finish_cleaning(&self, unit_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let unit = self.get_required(unit_id).await?;
        if unit.status != UnitStatus::Cleaning {
            return Err(AppError::validation(format!(
                "Unit {} is not in cleaning",
                unit.unit_number
            )));
        }

        let won = self
            .projector
            .finish_cleaning(unit_id, Actor::User(user_id))
            .await?;
        if !won {
            return Err(AppError::conflict(
                "Cleaning was already finished by another actor",
            ));
        }
        Ok(())
    }

    /// Derive the countdown view for a unit.
    pub async fn cleaning_status(&self, unit_id: Uuid) -> AppResult<CleaningStatus> {
        let unit = self.get_required(unit_id).await?;
        Ok(self.derive_status(&unit))
    }

    /// Derive the countdown view from an already-loaded unit row.
    pub fn derive_status(&self, unit: &Unit) -> CleaningStatus {
        let started_at = match (unit.status, unit.cleaning_started_at) {
            (UnitStatus::Cleaning, Some(started)) => started,
            _ => return CleaningStatus::idle(),
        };

        let now = self.clock.now();
        let extended = i64::from(unit.cleaning_extended_minutes);
        let budget = unit.cleaning_budget_minutes(self.config.base_duration_minutes);
        let elapsed = (now - started_at).num_minutes();
        let remaining = budget - elapsed;

        CleaningStatus {
            in_cleaning: true,
            started_at: Some(started_at),
            elapsed_minutes: elapsed,
            remaining_minutes: remaining,
            extended_minutes: extended,
            can_extend: extended < self.config.max_extension_minutes,
            overtime: remaining <= 0,
        }
    }

    async fn get_required(&self, unit_id: Uuid) -> AppResult<Unit> {
        self.units
            .get_unit(unit_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Unit {unit_id} not found")))
    }
}
