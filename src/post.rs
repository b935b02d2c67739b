//! Post lifecycle manager.
//!
//! Owns the Post+Media aggregate: listings, the pending/published state
//! machine, and the two-phase parent-then-children write used when media
//! files accompany a post.
//!
//! State machine: a post enters `Pending` at creation unless its author is
//! a teacher, in which case it is published immediately. `confirm` is the
//! only transition out of pending; deletion is the only exit. There is no
//! unpublish.

use crate::error::OpError;
use crate::filesystem::{self, UploadPayload};
use crate::orm::{media, posts, users};
use crate::user::Profile;
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, TransactionTrait};
use std::collections::HashMap;

/// Caller-supplied post fields. The same shape serves create and edit;
/// edit ignores nothing here but touches no other column.
#[derive(Clone, Debug)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
}

/// A post with its owning user and attached media eagerly loaded.
#[derive(Debug)]
pub struct PostWithRelations {
    pub post: posts::Model,
    pub author: Option<users::Model>,
    pub media: Vec<media::Model>,
}

fn validate(new_post: &NewPost) -> Result<(), OpError> {
    if new_post.title.trim().is_empty() {
        return Err(OpError::validation("title", "Title is required"));
    }
    if new_post.description.trim().is_empty() {
        return Err(OpError::validation("description", "Description is required"));
    }
    Ok(())
}

/// Total pages for the given page size, `ceil(count / page_size)`.
pub fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

/// Attaches loaded media rows to their parent posts.
async fn with_media(
    db: &DatabaseConnection,
    rows: Vec<(posts::Model, Option<users::Model>)>,
) -> Result<Vec<PostWithRelations>, OpError> {
    let ids: Vec<i32> = rows.iter().map(|(p, _)| p.id).collect();

    let mut by_post: HashMap<i32, Vec<media::Model>> = HashMap::new();
    if !ids.is_empty() {
        let media_rows = media::Entity::find()
            .filter(media::Column::PostId.is_in(ids))
            .order_by_asc(media::Column::Id)
            .all(db)
            .await?;
        for row in media_rows {
            by_post.entry(row.post_id).or_default().push(row);
        }
    }

    Ok(rows
        .into_iter()
        .map(|(post, author)| {
            let media = by_post.remove(&post.id).unwrap_or_default();
            PostWithRelations {
                post,
                author,
                media,
            }
        })
        .collect())
}

/// Posts ordered by creation date descending, windowed to one page, with
/// owner and media loaded. Pages past the end come back empty rather than
/// erroring. `page` and `page_size` are clamped to >= 1 but deliberately
/// not capped; the upper bound is the caller's problem.
pub async fn list_recent(
    db: &DatabaseConnection,
    page: u64,
    page_size: u64,
) -> Result<Vec<PostWithRelations>, OpError> {
    let page = page.max(1);
    let page_size = page_size.max(1);

    let rows = posts::Entity::find()
        .find_also_related(users::Entity)
        .order_by_desc(posts::Column::CreationDate)
        // Tiebreaker for posts created in the same instant, so page
        // concatenation is deterministic.
        .order_by_desc(posts::Column::Id)
        .offset((page - 1) * page_size)
        .limit(page_size)
        .all(db)
        .await?;

    with_media(db, rows).await
}

/// All posts awaiting approval, oldest first so the review queue is stable.
pub async fn list_pending(db: &DatabaseConnection) -> Result<Vec<PostWithRelations>, OpError> {
    let rows = posts::Entity::find()
        .find_also_related(users::Entity)
        .filter(posts::Column::IsPending.eq(true))
        .order_by_asc(posts::Column::CreationDate)
        .order_by_asc(posts::Column::Id)
        .all(db)
        .await?;

    with_media(db, rows).await
}

pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<PostWithRelations, OpError> {
    let row = posts::Entity::find_by_id(id)
        .find_also_related(users::Entity)
        .one(db)
        .await?
        .ok_or(OpError::NotFound("Post"))?;

    let mut loaded = with_media(db, vec![row]).await?;
    Ok(loaded.remove(0))
}

pub async fn count_all(db: &DatabaseConnection) -> Result<u64, OpError> {
    Ok(posts::Entity::find().count(db).await? as u64)
}

/// Writes the media rows for already-stored files. Called only once the
/// parent post id exists.
async fn attach_media(
    db: &DatabaseConnection,
    post_id: i32,
    uploader_id: i32,
    images: Vec<UploadPayload>,
    video: Option<UploadPayload>,
    alt_text: &str,
) -> Result<(), OpError> {
    for image in images {
        let saved = filesystem::save_upload(image).await?;
        media::ActiveModel {
            alt_text: Set(alt_text.to_owned()),
            is_video: Set(false),
            file_path: Set(saved.file_path),
            file_size: Set(saved.file_size),
            file_type: Set(saved.file_type),
            post_id: Set(post_id),
            uploaded_by_user_id: Set(uploader_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    if let Some(video) = video {
        let saved = filesystem::save_upload(video).await?;
        media::ActiveModel {
            alt_text: Set("Video for post".to_owned()),
            is_video: Set(true),
            file_path: Set(saved.file_path),
            file_size: Set(saved.file_size),
            file_type: Set(saved.file_type),
            post_id: Set(post_id),
            uploaded_by_user_id: Set(uploader_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

/// Creates a post for `author`, then stores and attaches any media.
///
/// Two-phase write: the parent row is saved first to obtain its id; media
/// files and rows follow. If the parent save fails nothing was written. If
/// a media step fails after files hit the store, those files are orphaned
/// and the error is surfaced; this partial-failure outcome is part of the
/// contract.
pub async fn create(
    db: &DatabaseConnection,
    author: &Profile,
    new_post: NewPost,
    images: Vec<UploadPayload>,
    video: Option<UploadPayload>,
    alt_text: &str,
) -> Result<posts::Model, OpError> {
    validate(&new_post)?;

    let now = Utc::now().naive_utc();
    let post = posts::ActiveModel {
        title: Set(new_post.title),
        description: Set(new_post.description),
        category: Set(new_post.category),
        creation_date: Set(now),
        publish_date: Set(Some(now)),
        // Non-teacher authors require approval.
        is_pending: Set(!author.is_teacher),
        likes: Set(0),
        view_count: Set(0),
        user_id: Set(author.id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    attach_media(db, post.id, author.id, images, video, alt_text).await?;

    log::info!(
        "Post {} created by user {} (pending: {})",
        post.id,
        author.id,
        post.is_pending
    );
    Ok(post)
}

/// Overwrites title/description/category of an existing post and appends
/// any newly supplied media. Creation date, publish date and ownership are
/// immutable through this path. The caller must have verified ownership.
pub async fn edit(
    db: &DatabaseConnection,
    post_id: i32,
    changes: NewPost,
    images: Vec<UploadPayload>,
    video: Option<UploadPayload>,
    alt_text: &str,
) -> Result<posts::Model, OpError> {
    validate(&changes)?;

    let existing = posts::Entity::find_by_id(post_id)
        .one(db)
        .await?
        .ok_or(OpError::NotFound("Post"))?;
    let uploader_id = existing.user_id;

    let mut active: posts::ActiveModel = existing.into();
    active.title = Set(changes.title);
    active.description = Set(changes.description);
    active.category = Set(changes.category);
    let updated = active.update(db).await?;

    attach_media(db, updated.id, uploader_id, images, video, alt_text).await?;

    Ok(updated)
}

/// Removes the post and its media rows in one transaction. The explicit
/// child delete makes the cascade a tested contract independent of the
/// schema's FK rule. Media files stay in the store.
pub async fn delete(db: &DatabaseConnection, post_id: i32) -> Result<(), OpError> {
    let txn = db.begin().await?;

    if posts::Entity::find_by_id(post_id)
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(OpError::NotFound("Post"));
    }

    media::Entity::delete_many()
        .filter(media::Column::PostId.eq(post_id))
        .exec(&txn)
        .await?;
    posts::Entity::delete_by_id(post_id).exec(&txn).await?;

    txn.commit().await?;
    log::info!("Post {} deleted", post_id);
    Ok(())
}

/// Publishes a pending post: clears the pending flag and stamps the publish
/// date with the confirmation time. Idempotent in effect; re-confirming
/// just refreshes the publish date.
pub async fn confirm(db: &DatabaseConnection, post_id: i32) -> Result<posts::Model, OpError> {
    let existing = posts::Entity::find_by_id(post_id)
        .one(db)
        .await?
        .ok_or(OpError::NotFound("Post"))?;

    let mut active: posts::ActiveModel = existing.into();
    active.publish_date = Set(Some(Utc::now().naive_utc()));
    active.is_pending = Set(false);
    let updated = active.update(db).await?;

    log::info!("Post {} confirmed", post_id);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(title: &str, description: &str) -> NewPost {
        NewPost {
            title: title.to_owned(),
            description: description.to_owned(),
            category: None,
        }
    }

    #[test]
    fn validate_rejects_blank_title() {
        let err = validate(&new_post("  ", "body")).unwrap_err();
        assert!(matches!(err, OpError::Validation { field: "title", .. }));
    }

    #[test]
    fn validate_rejects_blank_description() {
        let err = validate(&new_post("title", "")).unwrap_err();
        assert!(matches!(
            err,
            OpError::Validation {
                field: "description",
                ..
            }
        ));
    }

    #[test]
    fn validate_accepts_populated_fields() {
        assert!(validate(&new_post("Welcome", "Hi")).is_ok());
    }

    #[test]
    fn page_count_is_ceiling_division() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(25, 10), 3);
    }
}
