use crate::session;
use actix_session::Session;
use actix_web::{get, HttpResponse, Responder};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_logout);
}

#[get("/logout")]
pub async fn view_logout(session: Session) -> impl Responder {
    session::clear_principal(&session);
    HttpResponse::Found()
        .append_header(("Location", "/login"))
        .finish()
}
