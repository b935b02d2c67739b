//! Editor for the fixed set of static legal pages.
//!
//! The selectable filenames are a hard allow-list; anything else is
//! rejected before any filesystem access happens.

use crate::app_config;
use crate::error::OpError;
use crate::middleware::ClientCtx;
use actix_web::{error, get, post, web, Error, Responder};
use askama_actix::{Template, TemplateToResponse};
use serde::Deserialize;
use std::path::PathBuf;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_static_pages).service(post_static_pages);
}

/// The three editable pages: stored filename and display label.
pub const ALLOWED_FILES: [(&str, &str); 3] = [
    ("AGB.txt", "AGB"),
    ("impressum.txt", "Impressum"),
    ("FAQ.txt", "FAQ"),
];

pub fn is_allowed_file(name: &str) -> bool {
    ALLOWED_FILES.iter().any(|(file, _)| *file == name)
}

fn page_path(name: &str) -> Result<PathBuf, OpError> {
    if !is_allowed_file(name) {
        return Err(OpError::validation(
            "selected_file",
            "Not one of the editable pages",
        ));
    }
    Ok(PathBuf::from(&app_config::get().storage.static_pages_dir).join(name))
}

#[derive(Template)]
#[template(path = "static_pages.html")]
pub struct StaticPagesTemplate {
    pub client: ClientCtx,
    pub options: Vec<(&'static str, &'static str)>,
    pub selected: String,
    pub content: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct FormData {
    pub csrf_token: String,
    pub selected_file: String,
    #[serde(default)]
    pub content: String,
}

#[get("/static-pages")]
pub async fn view_static_pages(client: ClientCtx) -> Result<impl Responder, Error> {
    client.require_user()?;
    Ok(StaticPagesTemplate {
        client,
        options: ALLOWED_FILES.to_vec(),
        selected: String::new(),
        content: String::new(),
        message: String::new(),
    }
    .to_response())
}

/// Load-then-save semantics: submitting without content loads the file into
/// the editor; submitting with content writes it back.
#[post("/static-pages")]
pub async fn post_static_pages(
    client: ClientCtx,
    session: actix_session::Session,
    form: web::Form<FormData>,
) -> Result<impl Responder, Error> {
    crate::middleware::csrf::validate_csrf_token(&session, &form.csrf_token)?;
    client.require_user()?;

    let form = form.into_inner();
    let path = page_path(&form.selected_file)?;

    let (content, message) = if form.content.trim().is_empty() {
        let loaded = web::block(move || std::fs::read_to_string(&path))
            .await
            .map_err(error::ErrorInternalServerError)?
            .map_err(|e| {
                log::warn!("static page read failed: {}", e);
                error::ErrorNotFound("File not found.")
            })?;
        (loaded, String::new())
    } else {
        let to_write = form.content.clone();
        web::block(move || {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, to_write)
        })
        .await
        .map_err(error::ErrorInternalServerError)?
        .map_err(error::ErrorInternalServerError)?;

        (
            form.content.clone(),
            format!("The content of {} has been updated.", form.selected_file),
        )
    };

    Ok(StaticPagesTemplate {
        client,
        options: ALLOWED_FILES.to_vec(),
        selected: form.selected_file,
        content,
        message,
    }
    .to_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_accepts_the_three_pages() {
        assert!(is_allowed_file("AGB.txt"));
        assert!(is_allowed_file("impressum.txt"));
        assert!(is_allowed_file("FAQ.txt"));
    }

    #[test]
    fn allow_list_rejects_everything_else() {
        assert!(!is_allowed_file("agb.txt"));
        assert!(!is_allowed_file("../secrets.txt"));
        assert!(!is_allowed_file("/etc/passwd"));
        assert!(!is_allowed_file(""));
    }

    #[test]
    fn page_path_refuses_before_touching_the_filesystem() {
        assert!(page_path("../../etc/passwd").is_err());
        assert!(page_path("FAQ.txt").is_ok());
    }
}
