use crate::db::get_db_pool;
use crate::error::OpError;
use crate::filesystem::{self, UploadPayload};
use crate::middleware::ClientCtx;
use crate::post::{self, NewPost, PostWithRelations};
use actix_multipart::Multipart;
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama_actix::{Template, TemplateToResponse};
use futures::{StreamExt, TryStreamExt};
use serde::Deserialize;
use std::str;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_post)
        .service(edit_post)
        .service(update_post)
        .service(delete_post)
        .service(confirm_post);
}

#[derive(Template)]
#[template(path = "post_edit.html")]
pub struct PostEditTemplate {
    pub client: ClientCtx,
    pub post: PostWithRelations,
}

/// Forms that carry nothing but the CSRF token.
#[derive(Deserialize)]
pub struct CsrfFormData {
    pub csrf_token: String,
}

/// Everything a post form multipart body can carry. Text fields plus any
/// number of `images` parts and at most one `video` part.
#[derive(Default)]
struct PostFormParts {
    csrf_token: Option<String>,
    title: String,
    description: String,
    category: Option<String>,
    alt_text: String,
    images: Vec<UploadPayload>,
    video: Option<UploadPayload>,
}

async fn read_text_field(field: &mut actix_multipart::Field) -> Result<String, Error> {
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|e| {
            log::error!("post form: multipart read error: {}", e);
            error::ErrorBadRequest("Error interpreting user input.")
        })?;
        buf.extend(bytes.to_owned());
    }
    str::from_utf8(&buf)
        .map(|s| s.to_owned())
        .map_err(|_| error::ErrorBadRequest("Form field is not valid UTF-8."))
}

/// Drains the multipart stream into its parts. Unknown fields are rejected
/// outright, matching how the rest of the forms behave.
async fn read_post_form(mut fields: Multipart) -> Result<PostFormParts, Error> {
    let mut parts = PostFormParts::default();

    while let Ok(Some(mut field)) = fields.try_next().await {
        let Some(field_name) = field.content_disposition().get_name().map(str::to_owned) else {
            continue;
        };
        match field_name.as_str() {
            "csrf_token" => parts.csrf_token = Some(read_text_field(&mut field).await?),
            "title" => parts.title = read_text_field(&mut field).await?,
            "description" => parts.description = read_text_field(&mut field).await?,
            "category" => {
                let value = read_text_field(&mut field).await?;
                parts.category = (!value.trim().is_empty()).then_some(value);
            }
            "alt_text" => parts.alt_text = read_text_field(&mut field).await?,
            "images" => {
                if let Some(payload) = filesystem::read_field(&mut field).await? {
                    if !filesystem::is_image(&payload) {
                        return Err(error::ErrorBadRequest(
                            "Only image uploads are accepted in the images field.",
                        ));
                    }
                    parts.images.push(payload);
                }
            }
            "video" => {
                if let Some(payload) = filesystem::read_field(&mut field).await? {
                    if !filesystem::is_video(&payload) {
                        return Err(error::ErrorBadRequest(
                            "Only video uploads are accepted in the video field.",
                        ));
                    }
                    parts.video = Some(payload);
                }
            }
            other => {
                return Err(error::ErrorBadRequest(format!(
                    "Unrecognized field '{}'",
                    other
                )));
            }
        }
    }

    Ok(parts)
}

fn validate_parts_csrf(
    session: &actix_session::Session,
    parts: &PostFormParts,
) -> Result<(), Error> {
    let token = parts
        .csrf_token
        .as_deref()
        .ok_or_else(|| error::ErrorBadRequest("CSRF token missing"))?;
    crate::middleware::csrf::validate_csrf_token(session, token)
}

#[post("/posts/create")]
pub async fn create_post(
    client: ClientCtx,
    session: actix_session::Session,
    payload: Multipart,
) -> Result<impl Responder, Error> {
    let author = client.require_user()?.clone();

    let parts = read_post_form(payload).await?;
    validate_parts_csrf(&session, &parts)?;

    post::create(
        get_db_pool(),
        &author,
        NewPost {
            title: parts.title,
            description: parts.description,
            category: parts.category,
        },
        parts.images,
        parts.video,
        &parts.alt_text,
    )
    .await?;

    Ok(HttpResponse::Found()
        .append_header(("Location", "/"))
        .finish())
}

#[get("/posts/{post_id}/edit")]
pub async fn edit_post(client: ClientCtx, path: web::Path<i32>) -> Result<impl Responder, Error> {
    let post = post::get_by_id(get_db_pool(), path.into_inner()).await?;

    if !client.can_modify_post(&post.post) {
        return Err(OpError::PermissionDenied("update this post").into());
    }

    Ok(PostEditTemplate { client, post }.to_response())
}

#[post("/posts/{post_id}/edit")]
pub async fn update_post(
    client: ClientCtx,
    session: actix_session::Session,
    path: web::Path<i32>,
    payload: Multipart,
) -> Result<impl Responder, Error> {
    client.require_user()?;

    let parts = read_post_form(payload).await?;
    validate_parts_csrf(&session, &parts)?;

    let db = get_db_pool();
    let post_id = path.into_inner();
    let existing = post::get_by_id(db, post_id).await?;

    if !client.can_modify_post(&existing.post) {
        return Err(OpError::PermissionDenied("update this post").into());
    }

    post::edit(
        db,
        post_id,
        NewPost {
            title: parts.title,
            description: parts.description,
            category: parts.category,
        },
        parts.images,
        parts.video,
        &parts.alt_text,
    )
    .await?;

    Ok(HttpResponse::Found()
        .append_header(("Location", "/"))
        .finish())
}

#[post("/posts/{post_id}/delete")]
pub async fn delete_post(
    client: ClientCtx,
    session: actix_session::Session,
    path: web::Path<i32>,
    form: web::Form<CsrfFormData>,
) -> Result<impl Responder, Error> {
    crate::middleware::csrf::validate_csrf_token(&session, &form.csrf_token)?;
    client.require_user()?;

    let db = get_db_pool();
    let post_id = path.into_inner();
    let existing = post::get_by_id(db, post_id).await?;

    if !client.can_modify_post(&existing.post) {
        return Err(OpError::PermissionDenied("delete this post").into());
    }

    post::delete(db, post_id).await?;

    Ok(HttpResponse::Found()
        .append_header(("Location", "/"))
        .finish())
}

#[post("/posts/{post_id}/confirm")]
pub async fn confirm_post(
    client: ClientCtx,
    session: actix_session::Session,
    path: web::Path<i32>,
    form: web::Form<CsrfFormData>,
) -> Result<impl Responder, Error> {
    crate::middleware::csrf::validate_csrf_token(&session, &form.csrf_token)?;

    if !client.can_review() {
        return Err(OpError::PermissionDenied("approve posts").into());
    }

    post::confirm(get_db_pool(), path.into_inner()).await?;

    Ok(HttpResponse::Found()
        .append_header(("Location", "/"))
        .finish())
}
