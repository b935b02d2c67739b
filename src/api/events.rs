use crate::db::get_db_pool;
use crate::error::OpError;
use crate::event::{self, NewEvent};
use crate::orm::events;
use crate::user::Profile;
use actix_web::{delete, get, post, put, web, Error, HttpResponse, Responder};
use chrono::NaiveDateTime;
use sea_orm::{entity::*, query::*};
use serde::Deserialize;
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_events)
        .service(get_event)
        .service(create_event)
        .service(update_event)
        .service(delete_event);
}

fn event_not_found(id: i32) -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "message": format!("Event with ID {} not found.", id) }))
}

#[derive(Deserialize)]
pub struct EventInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub user_id: i32,
}

#[derive(Deserialize)]
pub struct EventUpdate {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

#[get("/api/events")]
pub async fn list_events() -> Result<impl Responder, Error> {
    let all = events::Entity::find()
        .order_by_asc(events::Column::StartDate)
        .all(get_db_pool())
        .await
        .map_err(OpError::from)?;
    Ok(HttpResponse::Ok().json(all))
}

#[get("/api/events/{id}")]
pub async fn get_event(path: web::Path<i32>) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    match events::Entity::find_by_id(id)
        .one(get_db_pool())
        .await
        .map_err(OpError::from)?
    {
        Some(found) => Ok(HttpResponse::Ok().json(found)),
        None => Ok(event_not_found(id)),
    }
}

/// Same date-range validation as the page action; rejections name the
/// offending field.
#[post("/api/events")]
pub async fn create_event(input: web::Json<EventInput>) -> Result<impl Responder, Error> {
    let input = input.into_inner();
    let db = get_db_pool();

    let owner = Profile::get_by_id(db, input.user_id).await?;
    let created = event::create(
        db,
        &owner,
        NewEvent {
            title: input.title,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(created))
}

#[put("/api/events/{id}")]
pub async fn update_event(
    path: web::Path<i32>,
    input: web::Json<EventUpdate>,
) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    let input = input.into_inner();

    if input.id != id {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": "Event ID mismatch." })));
    }

    match event::edit(
        get_db_pool(),
        id,
        NewEvent {
            title: input.title,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
        },
    )
    .await
    {
        Ok(_) => Ok(HttpResponse::Ok()
            .json(json!({ "message": format!("Event with ID {} updated successfully.", id) }))),
        Err(OpError::NotFound(_)) => Ok(event_not_found(id)),
        Err(e) => Err(e.into()),
    }
}

#[delete("/api/events/{id}")]
pub async fn delete_event(path: web::Path<i32>) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    let db = get_db_pool();

    if events::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(OpError::from)?
        .is_none()
    {
        return Ok(event_not_found(id));
    }

    events::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(OpError::from)?;

    Ok(HttpResponse::Ok()
        .json(json!({ "message": format!("Event with ID {} deleted successfully.", id) })))
}
