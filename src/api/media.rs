use crate::db::get_db_pool;
use crate::error::OpError;
use crate::orm::{media, posts};
use actix_web::{delete, get, post, put, web, Error, HttpResponse, Responder};
use sea_orm::{entity::*, query::*};
use serde::Deserialize;
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_media)
        .service(get_media)
        .service(create_media)
        .service(update_media)
        .service(delete_media);
}

fn media_not_found(id: i32) -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "message": format!("Media with ID {} not found.", id) }))
}

/// Media rows created here describe files the client already placed (or
/// references externally); this endpoint never writes to the media store.
#[derive(Deserialize)]
pub struct MediaInput {
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub is_video: bool,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub post_id: i32,
    pub uploaded_by_user_id: i32,
}

#[derive(Deserialize)]
pub struct MediaUpdate {
    pub id: i32,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub is_video: bool,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
}

#[get("/api/media")]
pub async fn list_media() -> Result<impl Responder, Error> {
    let all = media::Entity::find()
        .order_by_asc(media::Column::Id)
        .all(get_db_pool())
        .await
        .map_err(OpError::from)?;
    Ok(HttpResponse::Ok().json(all))
}

#[get("/api/media/{id}")]
pub async fn get_media(path: web::Path<i32>) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    match media::Entity::find_by_id(id)
        .one(get_db_pool())
        .await
        .map_err(OpError::from)?
    {
        Some(found) => Ok(HttpResponse::Ok().json(found)),
        None => Ok(media_not_found(id)),
    }
}

#[post("/api/media")]
pub async fn create_media(input: web::Json<MediaInput>) -> Result<impl Responder, Error> {
    let input = input.into_inner();
    let db = get_db_pool();

    // A media row may only reference a persisted post.
    if posts::Entity::find_by_id(input.post_id)
        .one(db)
        .await
        .map_err(OpError::from)?
        .is_none()
    {
        return Ok(HttpResponse::NotFound()
            .json(json!({ "message": format!("Post with ID {} not found.", input.post_id) })));
    }

    let created = media::ActiveModel {
        alt_text: Set(input.alt_text),
        is_video: Set(input.is_video),
        file_path: Set(input.file_path),
        file_size: Set(input.file_size),
        file_type: Set(input.file_type),
        post_id: Set(input.post_id),
        uploaded_by_user_id: Set(input.uploaded_by_user_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(OpError::from)?;

    Ok(HttpResponse::Created().json(created))
}

#[put("/api/media/{id}")]
pub async fn update_media(
    path: web::Path<i32>,
    input: web::Json<MediaUpdate>,
) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    let input = input.into_inner();

    if input.id != id {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": "Media ID mismatch." })));
    }

    let db = get_db_pool();
    let existing = match media::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(OpError::from)?
    {
        Some(found) => found,
        None => return Ok(media_not_found(id)),
    };

    // The parent post reference is immutable; re-parenting is not a thing.
    let mut active: media::ActiveModel = existing.into();
    active.alt_text = Set(input.alt_text);
    active.is_video = Set(input.is_video);
    active.file_path = Set(input.file_path);
    active.file_size = Set(input.file_size);
    active.file_type = Set(input.file_type);
    active.update(db).await.map_err(OpError::from)?;

    Ok(HttpResponse::Ok()
        .json(json!({ "message": format!("Media with ID {} updated successfully.", id) })))
}

/// Deletes the row only. The file in the media store stays behind, same as
/// when a whole post is deleted.
#[delete("/api/media/{id}")]
pub async fn delete_media(path: web::Path<i32>) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    let db = get_db_pool();

    if media::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(OpError::from)?
        .is_none()
    {
        return Ok(media_not_found(id));
    }

    media::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(OpError::from)?;

    Ok(HttpResponse::Ok()
        .json(json!({ "message": format!("Media with ID {} deleted successfully.", id) })))
}
