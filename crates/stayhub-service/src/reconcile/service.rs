//! Repair pass over units whose cached status the checkin history cannot
//! justify.
//!
//! Two drift patterns arise from partial failures (a checkin transition
//! committed but the paired unit write was lost):
//!
//! - **orphaned occupied**: `Occupied` with no in-house checkin;
//! - **stuck cleaning**: `Cleaning` far beyond any legitimate budget.
//!
//! All repairs go through the guarded projector, so a sweep racing the
//! scheduler or a user loses gracefully: the other writer already moved
//! the unit, and the row simply records no repair. Running the sweep
//! twice in a row on a consistent system repairs nothing the second
//! time.

use std::sync::Arc;

use chrono::Duration;

use stayhub_core::clock::Clock;
use stayhub_core::config::reconciliation::ReconciliationConfig;
use stayhub_core::result::AppResult;
use stayhub_entity::actor::Actor;
use stayhub_entity::unit::{Unit, UnitStatus};

use crate::store::{CheckinStore, UnitStore};
use crate::unit::UnitStatusProjector;

use super::report::{SweepReport, UnitRepair};

/// Reconciliation sweep service.
#[derive(Debug, Clone)]
pub struct ReconciliationService {
    units: Arc<dyn UnitStore>,
    checkins: Arc<dyn CheckinStore>,
    projector: Arc<UnitStatusProjector>,
    config: ReconciliationConfig,
    clock: Arc<dyn Clock>,
}

impl ReconciliationService {
    /// Create a new reconciliation service.
    pub fn new(
        units: Arc<dyn UnitStore>,
        checkins: Arc<dyn CheckinStore>,
        projector: Arc<UnitStatusProjector>,
        config: ReconciliationConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            units,
            checkins,
            projector,
            config,
            clock,
        }
    }

    /// Run one full sweep over all non-available units.
    ///
    /// Individual-row failures are logged and skipped; the next sweep
    /// retries naturally because the underlying condition persists.
    pub async fn run_sweep(&self) -> AppResult<SweepReport> {
        let units = self.units.list_non_available_units().await?;
        let mut report = SweepReport {
            scanned: units.len(),
            ..SweepReport::default()
        };

        for unit in &units {
            let outcome = match unit.status {
                UnitStatus::Occupied => self.repair_orphaned_occupied(unit).await,
                UnitStatus::Cleaning => self.repair_stuck_cleaning(unit).await,
                // Maintenance is operator territory; Available rows are
                // not returned by the listing.
                UnitStatus::Maintenance | UnitStatus::Available => Ok(None),
            };

            match outcome {
                Ok(Some(repair)) => match repair.from_status {
                    UnitStatus::Occupied => report.orphaned_occupied_repaired.push(repair),
                    _ => report.stuck_cleaning_repaired.push(repair),
                },
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        unit_id = %unit.id,
                        "Reconciliation skipped unit after store error: {}",
                        e
                    );
                    report.skipped += 1;
                }
            }
        }

        if report.is_clean() {
            tracing::debug!(scanned = report.scanned, "reconciliation sweep found no drift");
        } else {
            tracing::info!(
                scanned = report.scanned,
                orphaned = report.orphaned_occupied_repaired.len(),
                stuck = report.stuck_cleaning_repaired.len(),
                skipped = report.skipped,
                "reconciliation sweep repaired drift"
            );
        }

        Ok(report)
    }

    /// Repair an `Occupied` unit that no in-house checkin justifies.
    ///
    /// The should-be status is derived from the most recent checkin: if
    /// it reached a terminal state within the recency window the unit
    /// presumably still needs cleaning, otherwise it is available.
    async fn repair_orphaned_occupied(&self, unit: &Unit) -> AppResult<Option<UnitRepair>> {
        if self.checkins.find_in_house_by_unit(unit.id).await?.is_some() {
            return Ok(None);
        }

        let now = self.clock.now();
        let recency = Duration::minutes(self.config.orphan_cleaning_recency_minutes);
        let needs_cleaning = match self.checkins.find_latest_by_unit(unit.id).await? {
            Some(latest) => latest.status.is_terminal() && now - latest.updated_at <= recency,
            None => false,
        };

        let to_status = if needs_cleaning {
            UnitStatus::Cleaning
        } else {
            UnitStatus::Available
        };

        let won = self
            .projector
            .set_status(unit.id, UnitStatus::Occupied, to_status, Actor::ReconciliationJob)
            .await?;
        if !won {
            // Another actor fixed or re-occupied the unit mid-sweep.
            return Ok(None);
        }

        Ok(Some(UnitRepair {
            unit_id: unit.id,
            unit_number: unit.unit_number.clone(),
            from_status: UnitStatus::Occupied,
            to_status,
        }))
    }

    /// Force a unit out of `Cleaning` when it has sat there far beyond
    /// any legitimate budget.
    ///
    /// The threshold is intentionally much larger than the 30+10 minute
    /// cleaning budget so this repair never races the scheduler's normal
    /// cleaning completion.
    async fn repair_stuck_cleaning(&self, unit: &Unit) -> AppResult<Option<UnitRepair>> {
        let now = self.clock.now();
        let threshold = Duration::minutes(self.config.stuck_cleaning_threshold_minutes);
        if now - unit.updated_at < threshold {
            return Ok(None);
        }

        let won = self
            .projector
            .set_status(
                unit.id,
                UnitStatus::Cleaning,
                UnitStatus::Available,
                Actor::ReconciliationJob,
            )
            .await?;
        if !won {
            return Ok(None);
        }

        Ok(Some(UnitRepair {
            unit_id: unit.id,
            unit_number: unit.unit_number.clone(),
            from_status: UnitStatus::Cleaning,
            to_status: UnitStatus::Available,
        }))
    }
}
