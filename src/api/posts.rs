use crate::db::get_db_pool;
use crate::error::OpError;
use crate::orm::posts;
use crate::post::{self, NewPost};
use crate::user::Profile;
use actix_web::{delete, get, post as post_route, put, web, Error, HttpResponse, Responder};
use sea_orm::{entity::*, query::*};
use serde::Deserialize;
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_posts)
        .service(get_post)
        .service(create_post)
        .service(update_post)
        .service(delete_post);
}

fn post_not_found(id: i32) -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "message": format!("Post with ID {} not found.", id) }))
}

#[derive(Deserialize)]
pub struct PostInput {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub user_id: i32,
}

#[derive(Deserialize)]
pub struct PostUpdate {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
}

#[get("/api/posts")]
pub async fn list_posts() -> Result<impl Responder, Error> {
    let all = posts::Entity::find()
        .order_by_desc(posts::Column::CreationDate)
        .order_by_desc(posts::Column::Id)
        .all(get_db_pool())
        .await
        .map_err(OpError::from)?;
    Ok(HttpResponse::Ok().json(all))
}

#[get("/api/posts/{id}")]
pub async fn get_post(path: web::Path<i32>) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    match posts::Entity::find_by_id(id)
        .one(get_db_pool())
        .await
        .map_err(OpError::from)?
    {
        Some(found) => Ok(HttpResponse::Ok().json(found)),
        None => Ok(post_not_found(id)),
    }
}

/// Creation goes through the same lifecycle path as the page action, so the
/// pending flag still follows from the author's role. No media through this
/// endpoint; the mobile client attaches media rows via `/api/media`.
#[post_route("/api/posts")]
pub async fn create_post(input: web::Json<PostInput>) -> Result<impl Responder, Error> {
    let input = input.into_inner();
    let db = get_db_pool();

    let author = Profile::get_by_id(db, input.user_id).await?;
    let created = post::create(
        db,
        &author,
        NewPost {
            title: input.title,
            description: input.description,
            category: input.category,
        },
        Vec::new(),
        None,
        "",
    )
    .await?;

    Ok(HttpResponse::Created().json(created))
}

#[put("/api/posts/{id}")]
pub async fn update_post(
    path: web::Path<i32>,
    input: web::Json<PostUpdate>,
) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    let input = input.into_inner();

    if input.id != id {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": "Post ID mismatch." })));
    }

    let db = get_db_pool();
    if posts::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(OpError::from)?
        .is_none()
    {
        return Ok(post_not_found(id));
    }

    post::edit(
        db,
        id,
        NewPost {
            title: input.title,
            description: input.description,
            category: input.category,
        },
        Vec::new(),
        None,
        "",
    )
    .await?;

    Ok(HttpResponse::Ok()
        .json(json!({ "message": format!("Post with ID {} updated successfully.", id) })))
}

#[delete("/api/posts/{id}")]
pub async fn delete_post(path: web::Path<i32>) -> Result<impl Responder, Error> {
    let id = path.into_inner();

    match post::delete(get_db_pool(), id).await {
        Ok(()) => Ok(HttpResponse::Ok()
            .json(json!({ "message": format!("Post with ID {} deleted successfully.", id) }))),
        Err(OpError::NotFound(_)) => Ok(post_not_found(id)),
        Err(e) => Err(e.into()),
    }
}
