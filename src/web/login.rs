use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::users;
use crate::session;
use actix_session::Session;
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama_actix::{Template, TemplateToResponse};
use sea_orm::{entity::*, query::*};
use serde::Deserialize;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_login).service(post_login);
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub client: ClientCtx,
    pub error_message: String,
}

#[derive(Deserialize, Validate)]
pub struct FormData {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1))]
    password: String,
}

#[get("/login")]
pub async fn view_login(client: ClientCtx) -> impl Responder {
    LoginTemplate {
        client,
        error_message: String::new(),
    }
    .to_response()
}

#[post("/login")]
pub async fn post_login(
    client: ClientCtx,
    session: Session,
    form: web::Form<FormData>,
) -> Result<HttpResponse, Error> {
    if form.validate().is_err() {
        return Ok(invalid_login(client));
    }

    let db = get_db_pool();
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(form.email.trim()))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    // One generic answer for unknown email and wrong password alike.
    let user = match user {
        Some(user) if session::verify_password(&form.password, &user.password_hash) => user,
        _ => {
            log::info!("Failed login attempt for '{}'", form.email);
            return Ok(invalid_login(client));
        }
    };

    session::store_principal(&session, user.id)?;
    log::info!("User {} logged in", user.id);

    Ok(HttpResponse::Found()
        .append_header(("Location", "/"))
        .finish())
}

fn invalid_login(client: ClientCtx) -> HttpResponse {
    LoginTemplate {
        client,
        error_message: "Invalid login attempt.".to_owned(),
    }
    .to_response()
}
