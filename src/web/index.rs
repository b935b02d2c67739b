use crate::app_config;
use crate::db::get_db_pool;
use crate::event;
use crate::middleware::ClientCtx;
use crate::orm::events;
use crate::post::{self, PostWithRelations};
use actix_web::{get, web, Error, Responder};
use askama_actix::{Template, TemplateToResponse};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_index).service(view_index_page);
}

/// The content creator dashboard: recent posts (paginated), the pending
/// review queue, and the event calendar.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub client: ClientCtx,
    pub posts: Vec<PostWithRelations>,
    pub pending: Vec<PostWithRelations>,
    pub events: Vec<events::Model>,
    pub page: u64,
    pub total_pages: u64,
}

#[get("/")]
pub async fn view_index(client: ClientCtx) -> Result<impl Responder, Error> {
    render_dashboard(client, 1).await
}

#[get("/page-{page}")]
pub async fn view_index_page(
    client: ClientCtx,
    path: web::Path<u64>,
) -> Result<impl Responder, Error> {
    render_dashboard(client, path.into_inner()).await
}

async fn render_dashboard(client: ClientCtx, page: u64) -> Result<impl Responder, Error> {
    let db = get_db_pool();
    let page = page.max(1);
    let page_size = app_config::get().pagination.posts_per_page;

    let posts = post::list_recent(db, page, page_size).await?;
    let total = post::count_all(db).await?;

    // The review queue is only meaningful to users who can approve.
    let pending = if client.can_review() {
        post::list_pending(db).await?
    } else {
        Vec::new()
    };

    let events = event::list_all(db).await?;

    Ok(IndexTemplate {
        client,
        posts,
        pending,
        events,
        page,
        total_pages: post::page_count(total, page_size),
    }
    .to_response())
}
