use crate::db::get_db_pool;
use crate::error::OpError;
use crate::orm::users;
use crate::session;
use crate::user;
use actix_web::{delete, error, get, post, put, web, Error, HttpResponse, Responder};
use sea_orm::{entity::*, query::*};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user);
}

fn user_not_found(id: i32) -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "message": format!("User with ID {} not found.", id) }))
}

#[derive(Deserialize, Validate)]
pub struct UserInput {
    pub first_name: String,
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_teacher: bool,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Deserialize, Validate)]
pub struct UserUpdate {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    /// When absent the stored hash is kept.
    pub password: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_teacher: bool,
    #[serde(default)]
    pub is_admin: bool,
}

#[get("/api/users")]
pub async fn list_users() -> Result<impl Responder, Error> {
    let all = users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(get_db_pool())
        .await
        .map_err(OpError::from)?;
    Ok(HttpResponse::Ok().json(all))
}

#[get("/api/users/{id}")]
pub async fn get_user(path: web::Path<i32>) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    match users::Entity::find_by_id(id)
        .one(get_db_pool())
        .await
        .map_err(OpError::from)?
    {
        Some(found) => Ok(HttpResponse::Ok().json(found)),
        None => Ok(user_not_found(id)),
    }
}

#[post("/api/users")]
pub async fn create_user(input: web::Json<UserInput>) -> Result<impl Responder, Error> {
    let input = input.into_inner();
    input
        .validate()
        .map_err(|e| error::ErrorBadRequest(e.to_string()))?;

    let hash = session::hash_password(&input.password)
        .map_err(error::ErrorInternalServerError)?;

    let created = users::ActiveModel {
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        email: Set(input.email),
        password_hash: Set(hash),
        phone: Set(input.phone),
        is_teacher: Set(input.is_teacher),
        is_admin: Set(input.is_admin),
        ..Default::default()
    }
    .insert(get_db_pool())
    .await
    .map_err(OpError::from)?;

    Ok(HttpResponse::Created().json(created))
}

#[put("/api/users/{id}")]
pub async fn update_user(
    path: web::Path<i32>,
    input: web::Json<UserUpdate>,
) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    let input = input.into_inner();

    if input.id != id {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": "User ID mismatch." })));
    }
    input
        .validate()
        .map_err(|e| error::ErrorBadRequest(e.to_string()))?;

    let db = get_db_pool();
    let existing = match users::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(OpError::from)?
    {
        Some(found) => found,
        None => return Ok(user_not_found(id)),
    };

    let mut active: users::ActiveModel = existing.into();
    active.first_name = Set(input.first_name);
    active.last_name = Set(input.last_name);
    active.email = Set(input.email);
    active.phone = Set(input.phone);
    active.is_teacher = Set(input.is_teacher);
    active.is_admin = Set(input.is_admin);
    if let Some(password) = input.password {
        let hash = session::hash_password(&password).map_err(error::ErrorInternalServerError)?;
        active.password_hash = Set(hash);
    }
    active.update(db).await.map_err(OpError::from)?;

    Ok(HttpResponse::Ok()
        .json(json!({ "message": format!("User with ID {} updated successfully.", id) })))
}

#[delete("/api/users/{id}")]
pub async fn delete_user(path: web::Path<i32>) -> Result<impl Responder, Error> {
    let id = path.into_inner();

    match user::delete_cascading(get_db_pool(), id).await {
        Ok(()) => Ok(HttpResponse::Ok()
            .json(json!({ "message": format!("User with ID {} deleted successfully.", id) }))),
        Err(OpError::NotFound(_)) => Ok(user_not_found(id)),
        Err(e) => Err(e.into()),
    }
}
