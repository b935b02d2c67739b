//! Event creation, validation and editing against a live database.

mod common;

use aula::error::OpError;
use aula::event::{self, NewEvent};
use chrono::{NaiveDate, NaiveDateTime};
use serial_test::serial;

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("bad date in test")
        .and_hms_opt(12, 0, 0)
        .expect("bad time in test")
}

fn new_event(start: NaiveDateTime, end: NaiveDateTime) -> NewEvent {
    NewEvent {
        title: "Open day".to_string(),
        description: "All welcome".to_string(),
        start_date: start,
        end_date: end,
    }
}

#[actix_rt::test]
#[serial]
async fn create_rejects_inverted_date_range() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let owner = common::fixtures::create_test_user(&db, "owner@example.com", false, false)
        .await
        .expect("owner fixture failed");

    // start 2025-01-10, end 2025-01-05: must be rejected naming end_date.
    let err = event::create(&db, &owner, new_event(at(2025, 1, 10), at(2025, 1, 5)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OpError::Validation {
            field: "end_date",
            ..
        }
    ));

    // Nothing was written.
    assert!(event::list_all(&db).await.expect("list failed").is_empty());
}

#[actix_rt::test]
#[serial]
async fn create_stamps_owner_and_persists() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let owner = common::fixtures::create_test_user(&db, "owner@example.com", false, false)
        .await
        .expect("owner fixture failed");

    let created = event::create(&db, &owner, new_event(at(2025, 1, 5), at(2025, 1, 10)))
        .await
        .expect("create failed");
    assert_eq!(created.user_id, owner.id);

    let listed = event::list_all(&db).await.expect("list failed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
}

#[actix_rt::test]
#[serial]
async fn list_is_ordered_by_start_date() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let owner = common::fixtures::create_test_user(&db, "owner@example.com", false, false)
        .await
        .expect("owner fixture failed");

    let later = event::create(&db, &owner, new_event(at(2025, 3, 1), at(2025, 3, 2)))
        .await
        .expect("create failed");
    let earlier = event::create(&db, &owner, new_event(at(2025, 2, 1), at(2025, 2, 2)))
        .await
        .expect("create failed");

    let listed = event::list_all(&db).await.expect("list failed");
    let ids: Vec<i32> = listed.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![earlier.id, later.id]);
}

#[actix_rt::test]
#[serial]
async fn edit_updates_fields_and_validates_range() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let owner = common::fixtures::create_test_user(&db, "owner@example.com", false, false)
        .await
        .expect("owner fixture failed");
    let created = event::create(&db, &owner, new_event(at(2025, 1, 5), at(2025, 1, 10)))
        .await
        .expect("create failed");

    let updated = event::edit(
        &db,
        created.id,
        NewEvent {
            title: "Moved open day".to_string(),
            description: "New date".to_string(),
            start_date: at(2025, 1, 6),
            end_date: at(2025, 1, 11),
        },
    )
    .await
    .expect("edit failed");
    assert_eq!(updated.title, "Moved open day");
    assert_eq!(updated.start_date, at(2025, 1, 6));
    assert_eq!(updated.user_id, owner.id);

    let err = event::edit(&db, created.id, new_event(at(2025, 1, 10), at(2025, 1, 10)))
        .await
        .unwrap_err();
    assert!(matches!(err, OpError::Validation { .. }));
}

#[actix_rt::test]
#[serial]
async fn edit_missing_event_is_not_found() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let err = event::edit(&db, 9999, new_event(at(2025, 1, 5), at(2025, 1, 10)))
        .await
        .unwrap_err();
    assert!(matches!(err, OpError::NotFound(_)));
}
