//! Test fixtures for creating test data
#![allow(dead_code)]

use aula::error::OpError;
use aula::orm::{media, posts, users};
use aula::post::{self, NewPost};
use aula::user::Profile;
use sea_orm::{entity::*, DatabaseConnection, DbErr};

/// Create a user with a known password ("password123") and the given roles.
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    is_teacher: bool,
    is_admin: bool,
) -> Result<Profile, DbErr> {
    let password_hash = aula::session::hash_password("password123")
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?;

    let model = users::ActiveModel {
        first_name: Set("Test".to_string()),
        last_name: Set("User".to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        phone: Set(None),
        is_teacher: Set(is_teacher),
        is_admin: Set(is_admin),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(Profile::from(model))
}

/// Create a post through the real lifecycle path, without media.
pub async fn create_test_post(
    db: &DatabaseConnection,
    author: &Profile,
    title: &str,
    description: &str,
) -> Result<posts::Model, OpError> {
    post::create(
        db,
        author,
        NewPost {
            title: title.to_string(),
            description: description.to_string(),
            category: None,
        },
        Vec::new(),
        None,
        "",
    )
    .await
}

/// Attach a media row directly, standing in for an already-uploaded file.
pub async fn create_test_media(
    db: &DatabaseConnection,
    post_id: i32,
    uploader_id: i32,
) -> Result<media::Model, DbErr> {
    media::ActiveModel {
        alt_text: Set("Test image".to_string()),
        is_video: Set(false),
        file_path: Set(format!("/uploads/test-{}.jpg", post_id)),
        file_size: Set(1024),
        file_type: Set("image/jpeg".to_string()),
        post_id: Set(post_id),
        uploaded_by_user_id: Set(uploader_id),
        ..Default::default()
    }
    .insert(db)
    .await
}
