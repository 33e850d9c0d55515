//! Shared test fixtures: in-memory stores, a manual clock, and a
//! recording audit sink.
//!
//! The in-memory store reproduces the guard semantics of the real
//! repositories (guarded writes apply only when the expected pre-state
//! still holds, and a miss is `Ok(false)`), which is what the lifecycle
//! scenarios exercise.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use stayhub_core::clock::Clock;
use stayhub_core::config::cleaning::CleaningConfig;
use stayhub_core::config::reconciliation::ReconciliationConfig;
use stayhub_core::error::AppError;
use stayhub_core::result::AppResult;
use stayhub_entity::checkin::{
    Checkin, CheckinExtension, CheckinStatus, CreateCheckin, CreateCheckinExtension,
};
use stayhub_entity::unit::{Unit, UnitStatus, UnitStatusChange};
use stayhub_service::audit::{AuditEvent, AuditSink};
use stayhub_service::store::{CheckinStore, UnitStore};
use stayhub_service::{
    CheckinService, CleaningService, ReconciliationService, UnitStatusProjector,
};

/// Clock whose "now" only moves when a test says so.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// A fixed, readable starting instant.
    pub fn at_noon() -> Self {
        Self::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
    }

    pub fn advance_minutes(&self, minutes: i64) {
        *self.now.lock().unwrap() += Duration::minutes(minutes);
    }

    pub fn advance_hours(&self, hours: i64) {
        *self.now.lock().unwrap() += Duration::hours(hours);
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap() = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Audit sink that records events for assertions.
#[derive(Debug, Default)]
pub struct RecordingAudit {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAudit {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for RecordingAudit {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// In-memory store backing both gateway traits.
#[derive(Debug)]
pub struct MemoryStore {
    units: Mutex<HashMap<Uuid, Unit>>,
    checkins: Mutex<HashMap<Uuid, Checkin>>,
    extensions: Mutex<Vec<CheckinExtension>>,
    fail_next_checkin_insert: Mutex<bool>,
    clock: Arc<ManualClock>,
}

impl MemoryStore {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            units: Mutex::new(HashMap::new()),
            checkins: Mutex::new(HashMap::new()),
            extensions: Mutex::new(Vec::new()),
            fail_next_checkin_insert: Mutex::new(false),
            clock,
        }
    }

    /// Seed a unit in the given status.
    pub fn add_unit(&self, unit_number: &str, status: UnitStatus) -> Unit {
        let now = self.clock.now();
        let unit = Unit {
            id: Uuid::new_v4(),
            apartment_id: Uuid::new_v4(),
            unit_number: unit_number.to_string(),
            status,
            cleaning_started_at: if status == UnitStatus::Cleaning {
                Some(now)
            } else {
                None
            },
            cleaning_extended_minutes: 0,
            created_at: now,
            updated_at: now,
        };
        self.units.lock().unwrap().insert(unit.id, unit.clone());
        unit
    }

    /// Overwrite a stored unit row directly (for drift scenarios).
    pub fn put_unit(&self, unit: Unit) {
        self.units.lock().unwrap().insert(unit.id, unit);
    }

    /// Overwrite a stored checkin row directly.
    pub fn put_checkin(&self, checkin: Checkin) {
        self.checkins.lock().unwrap().insert(checkin.id, checkin);
    }

    /// Snapshot a unit row; panics if absent.
    pub fn unit(&self, id: Uuid) -> Unit {
        self.units.lock().unwrap().get(&id).cloned().unwrap()
    }

    /// Snapshot a checkin row; panics if absent.
    pub fn checkin(&self, id: Uuid) -> Checkin {
        self.checkins.lock().unwrap().get(&id).cloned().unwrap()
    }

    pub fn extensions(&self) -> Vec<CheckinExtension> {
        self.extensions.lock().unwrap().clone()
    }

    /// Make the next checkin insert fail with a database error.
    pub fn fail_next_checkin_insert(&self) {
        *self.fail_next_checkin_insert.lock().unwrap() = true;
    }
}

#[async_trait]
impl UnitStore for MemoryStore {
    async fn get_unit(&self, id: Uuid) -> AppResult<Option<Unit>> {
        Ok(self.units.lock().unwrap().get(&id).cloned())
    }

    async fn list_cleaning_units(&self) -> AppResult<Vec<Unit>> {
        let mut units: Vec<Unit> = self
            .units
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.status == UnitStatus::Cleaning)
            .cloned()
            .collect();
        units.sort_by_key(|u| u.cleaning_started_at);
        Ok(units)
    }

    async fn list_non_available_units(&self) -> AppResult<Vec<Unit>> {
        Ok(self
            .units
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.status != UnitStatus::Available)
            .cloned()
            .collect())
    }

    async fn update_status_guarded(
        &self,
        id: Uuid,
        expected: UnitStatus,
        change: UnitStatusChange,
    ) -> AppResult<bool> {
        let mut units = self.units.lock().unwrap();
        match units.get_mut(&id) {
            Some(unit) if unit.status == expected => {
                unit.status = change.status;
                unit.cleaning_started_at = change.cleaning_started_at;
                unit.cleaning_extended_minutes = change.cleaning_extended_minutes;
                unit.updated_at = self.clock.now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_cleaning_extension_guarded(
        &self,
        id: Uuid,
        expected_minutes: i32,
        new_minutes: i32,
    ) -> AppResult<bool> {
        let mut units = self.units.lock().unwrap();
        match units.get_mut(&id) {
            Some(unit)
                if unit.status == UnitStatus::Cleaning
                    && unit.cleaning_extended_minutes == expected_minutes =>
            {
                unit.cleaning_extended_minutes = new_minutes;
                unit.updated_at = self.clock.now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl CheckinStore for MemoryStore {
    async fn get_checkin(&self, id: Uuid) -> AppResult<Option<Checkin>> {
        Ok(self.checkins.lock().unwrap().get(&id).cloned())
    }

    async fn insert_checkin(&self, data: CreateCheckin) -> AppResult<Checkin> {
        {
            let mut fail = self.fail_next_checkin_insert.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(AppError::database("injected insert failure"));
            }
        }

        let now = self.clock.now();
        let checkin = Checkin {
            id: Uuid::new_v4(),
            unit_id: data.unit_id,
            apartment_id: data.apartment_id,
            team_id: data.team_id,
            status: CheckinStatus::Active,
            duration_hours: data.duration_hours,
            checkout_time: data.checkout_time,
            payment_method: data.payment_method,
            payment_amount: data.payment_amount,
            marketing_name: data.marketing_name,
            notes: data.notes,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };
        self.checkins
            .lock()
            .unwrap()
            .insert(checkin.id, checkin.clone());
        Ok(checkin)
    }

    async fn find_in_house_by_unit(&self, unit_id: Uuid) -> AppResult<Option<Checkin>> {
        Ok(self
            .checkins
            .lock()
            .unwrap()
            .values()
            .find(|c| c.unit_id == unit_id && c.is_in_house())
            .cloned())
    }

    async fn find_latest_by_unit(&self, unit_id: Uuid) -> AppResult<Option<Checkin>> {
        Ok(self
            .checkins
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.unit_id == unit_id)
            .max_by_key(|c| c.updated_at)
            .cloned())
    }

    async fn list_due(&self, now: DateTime<Utc>) -> AppResult<Vec<Checkin>> {
        Ok(self
            .checkins
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.is_in_house() && c.is_due(now))
            .cloned()
            .collect())
    }

    async fn complete_guarded(
        &self,
        id: Uuid,
        terminal_status: CheckinStatus,
    ) -> AppResult<bool> {
        let mut checkins = self.checkins.lock().unwrap();
        match checkins.get_mut(&id) {
            Some(checkin) if checkin.is_in_house() => {
                checkin.status = terminal_status;
                checkin.updated_at = self.clock.now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn complete_due_guarded(
        &self,
        id: Uuid,
        terminal_status: CheckinStatus,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut checkins = self.checkins.lock().unwrap();
        match checkins.get_mut(&id) {
            Some(checkin) if checkin.is_in_house() && checkin.checkout_time <= now => {
                checkin.status = terminal_status;
                checkin.updated_at = self.clock.now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn extend_guarded(
        &self,
        id: Uuid,
        expected_checkout_time: DateTime<Utc>,
        new_checkout_time: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut checkins = self.checkins.lock().unwrap();
        match checkins.get_mut(&id) {
            Some(checkin)
                if checkin.is_in_house() && checkin.checkout_time == expected_checkout_time =>
            {
                checkin.checkout_time = new_checkout_time;
                checkin.status = CheckinStatus::Extended;
                checkin.updated_at = self.clock.now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_extension(
        &self,
        data: CreateCheckinExtension,
    ) -> AppResult<CheckinExtension> {
        let extension = CheckinExtension {
            id: Uuid::new_v4(),
            checkin_id: data.checkin_id,
            additional_hours: data.additional_hours,
            new_checkout_time: data.new_checkout_time,
            payment_method: data.payment_method,
            payment_amount: data.payment_amount,
            notes: data.notes,
            created_by: data.created_by,
            created_at: self.clock.now(),
        };
        self.extensions.lock().unwrap().push(extension.clone());
        Ok(extension)
    }

    async fn list_extensions(&self, checkin_id: Uuid) -> AppResult<Vec<CheckinExtension>> {
        let mut extensions: Vec<CheckinExtension> = self
            .extensions
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.checkin_id == checkin_id)
            .cloned()
            .collect();
        extensions.sort_by_key(|e| e.created_at);
        Ok(extensions)
    }
}

/// Fully wired engine over the in-memory store.
pub struct TestEnv {
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
    pub audit: Arc<RecordingAudit>,
    pub projector: Arc<UnitStatusProjector>,
    pub checkin_service: Arc<CheckinService>,
    pub cleaning_service: Arc<CleaningService>,
    pub reconciliation_service: Arc<ReconciliationService>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_configs(CleaningConfig::default(), ReconciliationConfig::default())
    }

    pub fn with_configs(cleaning: CleaningConfig, reconciliation: ReconciliationConfig) -> Self {
        let clock = Arc::new(ManualClock::at_noon());
        let store = Arc::new(MemoryStore::new(Arc::clone(&clock)));
        let audit = Arc::new(RecordingAudit::default());

        let units: Arc<dyn UnitStore> = Arc::clone(&store) as Arc<dyn UnitStore>;
        let checkins: Arc<dyn CheckinStore> = Arc::clone(&store) as Arc<dyn CheckinStore>;
        let clock_dyn: Arc<dyn Clock> = Arc::clone(&clock) as Arc<dyn Clock>;
        let audit_dyn: Arc<dyn AuditSink> = Arc::clone(&audit) as Arc<dyn AuditSink>;

        let projector = Arc::new(UnitStatusProjector::new(
            Arc::clone(&units),
            Arc::clone(&clock_dyn),
            Arc::clone(&audit_dyn),
        ));
        let checkin_service = Arc::new(CheckinService::new(
            Arc::clone(&checkins),
            Arc::clone(&units),
            Arc::clone(&projector),
            Arc::clone(&clock_dyn),
            Arc::clone(&audit_dyn),
        ));
        let cleaning_service = Arc::new(CleaningService::new(
            Arc::clone(&units),
            Arc::clone(&projector),
            cleaning,
            Arc::clone(&clock_dyn),
        ));
        let reconciliation_service = Arc::new(ReconciliationService::new(
            Arc::clone(&units),
            Arc::clone(&checkins),
            Arc::clone(&projector),
            reconciliation,
            Arc::clone(&clock_dyn),
        ));

        Self {
            clock,
            store,
            audit,
            projector,
            checkin_service,
            cleaning_service,
            reconciliation_service,
        }
    }

    /// Shorthand for a minimal create request against `unit_id`.
    pub fn checkin_request(
        &self,
        unit_id: Uuid,
        duration_hours: i32,
    ) -> stayhub_service::checkin::CreateCheckinRequest {
        stayhub_service::checkin::CreateCheckinRequest {
            unit_id,
            team_id: None,
            duration_hours,
            payment_method: Some("cash".to_string()),
            payment_amount: Some(50_000),
            marketing_name: None,
            notes: None,
        }
    }
}
