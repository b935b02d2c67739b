//! Identity gate lookups and the cascading user delete.

mod common;

use aula::error::OpError;
use aula::event::{self, NewEvent};
use aula::orm::{events, media, posts};
use aula::user::{self, Profile};
use chrono::{Duration, Utc};
use sea_orm::{entity::*, query::*};
use serial_test::serial;

#[actix_rt::test]
#[serial]
async fn lookup_by_email_finds_stored_user() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let created = common::fixtures::create_test_user(&db, "known@example.com", false, false)
        .await
        .expect("user fixture failed");

    let found = Profile::get_by_email(&db, "known@example.com")
        .await
        .expect("lookup failed");
    assert_eq!(found.id, created.id);
    assert_eq!(found.email, "known@example.com");
}

#[actix_rt::test]
#[serial]
async fn lookup_by_unknown_email_is_not_found() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let err = Profile::get_by_email(&db, "nobody@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, OpError::NotFound(_)));
}

#[actix_rt::test]
#[serial]
async fn delete_cascading_removes_all_authored_content() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let doomed = common::fixtures::create_test_user(&db, "doomed@example.com", false, false)
        .await
        .expect("user fixture failed");
    let bystander = common::fixtures::create_test_user(&db, "bystander@example.com", true, false)
        .await
        .expect("user fixture failed");

    let doomed_post = common::fixtures::create_test_post(&db, &doomed, "Mine", "Body")
        .await
        .expect("post fixture failed");
    common::fixtures::create_test_media(&db, doomed_post.id, doomed.id)
        .await
        .expect("media fixture failed");

    let now = Utc::now().naive_utc();
    event::create(
        &db,
        &doomed,
        NewEvent {
            title: "Doomed event".to_string(),
            description: String::new(),
            start_date: now,
            end_date: now + Duration::hours(1),
        },
    )
    .await
    .expect("event fixture failed");

    let kept_post = common::fixtures::create_test_post(&db, &bystander, "Keep", "Body")
        .await
        .expect("post fixture failed");

    user::delete_cascading(&db, doomed.id)
        .await
        .expect("delete failed");

    assert!(matches!(
        Profile::get_by_id(&db, doomed.id).await.unwrap_err(),
        OpError::NotFound(_)
    ));
    assert_eq!(
        posts::Entity::find()
            .filter(posts::Column::UserId.eq(doomed.id))
            .count(&db)
            .await
            .expect("count failed"),
        0
    );
    assert_eq!(
        media::Entity::find()
            .filter(media::Column::PostId.eq(doomed_post.id))
            .count(&db)
            .await
            .expect("count failed"),
        0
    );
    assert_eq!(
        events::Entity::find()
            .filter(events::Column::UserId.eq(doomed.id))
            .count(&db)
            .await
            .expect("count failed"),
        0
    );

    // The other user's content is untouched.
    assert!(Profile::get_by_id(&db, bystander.id).await.is_ok());
    assert!(posts::Entity::find_by_id(kept_post.id)
        .one(&db)
        .await
        .expect("query failed")
        .is_some());
}

#[actix_rt::test]
#[serial]
async fn delete_cascading_missing_user_is_not_found() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let err = user::delete_cascading(&db, 9999).await.unwrap_err();
    assert!(matches!(err, OpError::NotFound(_)));
}
