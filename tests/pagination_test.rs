//! Listing and pagination properties of the recent-posts window.

mod common;

use aula::post;
use serial_test::serial;

#[actix_rt::test]
#[serial]
async fn pages_never_exceed_page_size_and_concatenate_in_order() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let teacher = common::fixtures::create_test_user(&db, "teacher@example.com", true, false)
        .await
        .expect("teacher fixture failed");

    for n in 1..=25 {
        common::fixtures::create_test_post(&db, &teacher, &format!("Post {:02}", n), "Body")
            .await
            .expect("post fixture failed");
    }

    let page_size = 10;
    let mut concatenated: Vec<i32> = Vec::new();
    for page in 1..=3 {
        let items = post::list_recent(&db, page, page_size)
            .await
            .expect("list failed");
        assert!(items.len() as u64 <= page_size);
        concatenated.extend(items.iter().map(|i| i.post.id));
    }
    assert_eq!(concatenated.len(), 25);

    // Pages 1..3 concatenated match one big page of 30 cut to 25 items.
    let all = post::list_recent(&db, 1, 30).await.expect("list failed");
    let all_ids: Vec<i32> = all.iter().map(|i| i.post.id).collect();
    assert_eq!(concatenated, all_ids);

    // Newest first: ids descend because all posts share a creation instant
    // window and the id is the tiebreaker.
    let mut sorted = all_ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(all_ids, sorted);
}

#[actix_rt::test]
#[serial]
async fn page_past_the_end_is_empty() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let teacher = common::fixtures::create_test_user(&db, "teacher@example.com", true, false)
        .await
        .expect("teacher fixture failed");
    common::fixtures::create_test_post(&db, &teacher, "Only one", "Body")
        .await
        .expect("post fixture failed");

    let items = post::list_recent(&db, 99, 10).await.expect("list failed");
    assert!(items.is_empty());
}

#[actix_rt::test]
#[serial]
async fn count_tracks_creates_and_deletes() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let teacher = common::fixtures::create_test_user(&db, "teacher@example.com", true, false)
        .await
        .expect("teacher fixture failed");

    assert_eq!(post::count_all(&db).await.expect("count failed"), 0);

    let first = common::fixtures::create_test_post(&db, &teacher, "One", "Body")
        .await
        .expect("post fixture failed");
    assert_eq!(post::count_all(&db).await.expect("count failed"), 1);

    common::fixtures::create_test_post(&db, &teacher, "Two", "Body")
        .await
        .expect("post fixture failed");
    assert_eq!(post::count_all(&db).await.expect("count failed"), 2);

    post::delete(&db, first.id).await.expect("delete failed");
    assert_eq!(post::count_all(&db).await.expect("count failed"), 1);
}

#[actix_rt::test]
#[serial]
async fn pending_queue_lists_only_pending_oldest_first() {
    let Some(db) = common::database::setup_test_database().await else {
        return;
    };
    common::database::cleanup_test_data(&db)
        .await
        .expect("cleanup failed");

    let student = common::fixtures::create_test_user(&db, "student@example.com", false, false)
        .await
        .expect("student fixture failed");
    let teacher = common::fixtures::create_test_user(&db, "teacher@example.com", true, false)
        .await
        .expect("teacher fixture failed");

    let oldest = common::fixtures::create_test_post(&db, &student, "First", "Body")
        .await
        .expect("post fixture failed");
    let newest = common::fixtures::create_test_post(&db, &student, "Second", "Body")
        .await
        .expect("post fixture failed");
    common::fixtures::create_test_post(&db, &teacher, "Published", "Body")
        .await
        .expect("post fixture failed");

    let pending = post::list_pending(&db).await.expect("list failed");
    let ids: Vec<i32> = pending.iter().map(|i| i.post.id).collect();
    assert_eq!(ids, vec![oldest.id, newest.id]);
}
