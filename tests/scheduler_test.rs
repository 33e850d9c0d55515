//! Scheduler tick scenarios: the auto-checkout pass and the
//! cleaning-completion pass, driven through the tick handlers.

mod common;

use std::sync::Arc;

use uuid::Uuid;

use stayhub_core::clock::Clock;
use stayhub_entity::checkin::CheckinStatus;
use stayhub_entity::unit::UnitStatus;
use stayhub_service::store::{CheckinStore, UnitStore};
use stayhub_worker::jobs::TickHandler;
use stayhub_worker::{AutoCheckoutHandler, CleaningCompletionHandler};

use common::TestEnv;

fn checkout_handler(env: &TestEnv) -> AutoCheckoutHandler {
    AutoCheckoutHandler::new(
        Arc::clone(&env.store) as Arc<dyn CheckinStore>,
        Arc::clone(&env.checkin_service),
        Arc::clone(&env.clock) as Arc<dyn Clock>,
    )
}

fn cleaning_handler(env: &TestEnv) -> CleaningCompletionHandler {
    CleaningCompletionHandler::new(
        Arc::clone(&env.store) as Arc<dyn UnitStore>,
        Arc::clone(&env.projector),
        Default::default(),
        Arc::clone(&env.clock) as Arc<dyn Clock>,
    )
}

#[tokio::test]
async fn due_checkin_is_completed_and_cleaning_starts() {
    let env = TestEnv::new();
    let unit = env.store.add_unit("301", UnitStatus::Available);
    let checkin = env
        .checkin_service
        .create_checkin(env.checkin_request(unit.id, 2), Uuid::new_v4())
        .await
        .unwrap();

    env.clock.advance_hours(2);
    let summary = checkout_handler(&env).run().await.unwrap();

    assert_eq!(summary["completed"], 1);
    assert_eq!(summary["failed"], 0);
    assert_eq!(
        env.store.checkin(checkin.id).status,
        CheckinStatus::Completed
    );

    let stored_unit = env.store.unit(unit.id);
    assert_eq!(stored_unit.status, UnitStatus::Cleaning);
    assert_eq!(stored_unit.cleaning_started_at, Some(env.clock.now()));
}

#[tokio::test]
async fn tick_ignores_checkins_that_are_not_yet_due() {
    let env = TestEnv::new();
    let unit = env.store.add_unit("302", UnitStatus::Available);
    let checkin = env
        .checkin_service
        .create_checkin(env.checkin_request(unit.id, 3), Uuid::new_v4())
        .await
        .unwrap();

    env.clock.advance_hours(1);
    let summary = checkout_handler(&env).run().await.unwrap();

    assert_eq!(summary["due"], 0);
    assert_eq!(env.store.checkin(checkin.id).status, CheckinStatus::Active);
}

#[tokio::test]
async fn one_tick_clears_a_backlog_of_due_checkins() {
    let env = TestEnv::new();
    let handler = checkout_handler(&env);
    let mut ids = Vec::new();

    for n in 0..3 {
        let unit = env
            .store
            .add_unit(&format!("30{}", 3 + n), UnitStatus::Available);
        let checkin = env
            .checkin_service
            .create_checkin(env.checkin_request(unit.id, 1), Uuid::new_v4())
            .await
            .unwrap();
        ids.push(checkin.id);
    }

    // Well past every checkout time, as after a scheduler outage.
    env.clock.advance_hours(6);
    let summary = handler.run().await.unwrap();

    assert_eq!(summary["completed"], 3);
    for id in ids {
        assert_eq!(env.store.checkin(id).status, CheckinStatus::Completed);
    }
}

#[tokio::test]
async fn extended_checkin_is_only_closed_at_its_new_checkout_time() {
    let env = TestEnv::new();
    let handler = checkout_handler(&env);
    let unit = env.store.add_unit("306", UnitStatus::Available);
    let user = Uuid::new_v4();

    let checkin = env
        .checkin_service
        .create_checkin(env.checkin_request(unit.id, 2), user)
        .await
        .unwrap();
    env.checkin_service
        .extend_checkin(
            checkin.id,
            stayhub_service::checkin::ExtendCheckinRequest {
                additional_hours: 2,
                payment_method: None,
                payment_amount: None,
                notes: None,
            },
            user,
        )
        .await
        .unwrap();

    env.clock.advance_hours(3);
    let summary = handler.run().await.unwrap();
    assert_eq!(summary["due"], 0);
    assert_eq!(
        env.store.checkin(checkin.id).status,
        CheckinStatus::Extended
    );

    env.clock.advance_hours(1);
    let summary = handler.run().await.unwrap();
    assert_eq!(summary["completed"], 1);
}

#[tokio::test]
async fn cleaning_finishes_when_the_base_budget_elapses() {
    let env = TestEnv::new();
    let unit = env.store.add_unit("307", UnitStatus::Cleaning);

    env.clock.advance_minutes(30);
    let summary = cleaning_handler(&env).run().await.unwrap();

    assert_eq!(summary["finished"], 1);
    let stored = env.store.unit(unit.id);
    assert_eq!(stored.status, UnitStatus::Available);
    assert!(stored.cleaning_started_at.is_none());
    assert_eq!(stored.cleaning_extended_minutes, 0);
}

#[tokio::test]
async fn extension_pushes_the_cleaning_deadline_out() {
    let env = TestEnv::new();
    let handler = cleaning_handler(&env);
    let unit = env.store.add_unit("308", UnitStatus::Cleaning);

    env.cleaning_service
        .extend_cleaning(unit.id, 10, Uuid::new_v4())
        .await
        .unwrap();

    env.clock.advance_minutes(35);
    let summary = handler.run().await.unwrap();
    assert_eq!(summary["finished"], 0);
    assert_eq!(env.store.unit(unit.id).status, UnitStatus::Cleaning);

    env.clock.advance_minutes(5);
    let summary = handler.run().await.unwrap();
    assert_eq!(summary["finished"], 1);
    assert_eq!(env.store.unit(unit.id).status, UnitStatus::Available);
}

#[tokio::test]
async fn full_lifecycle_checkin_to_available_again() {
    let env = TestEnv::new();
    let checkout = checkout_handler(&env);
    let cleaning = cleaning_handler(&env);
    let unit = env.store.add_unit("309", UnitStatus::Available);

    env.checkin_service
        .create_checkin(env.checkin_request(unit.id, 2), Uuid::new_v4())
        .await
        .unwrap();

    env.clock.advance_hours(2);
    checkout.run().await.unwrap();
    assert_eq!(env.store.unit(unit.id).status, UnitStatus::Cleaning);

    env.clock.advance_minutes(30);
    cleaning.run().await.unwrap();
    assert_eq!(env.store.unit(unit.id).status, UnitStatus::Available);
}
