use crate::db::get_db_pool;
use crate::error::OpError;
use crate::event::{self, NewEvent};
use crate::middleware::ClientCtx;
use actix_web::{post, web, Error, HttpResponse, Responder};
use chrono::NaiveDateTime;
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_event).service(update_event);
}

#[derive(Deserialize)]
pub struct EventFormData {
    pub csrf_token: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

/// Parses the value of an HTML `datetime-local` input. Browsers omit the
/// seconds unless the user typed them.
fn parse_form_datetime(value: &str, field: &'static str) -> Result<NaiveDateTime, OpError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|_| OpError::validation(field, "Not a valid date and time"))
}

impl EventFormData {
    fn into_new_event(self) -> Result<NewEvent, OpError> {
        Ok(NewEvent {
            title: self.title,
            description: self.description,
            start_date: parse_form_datetime(&self.start_date, "start_date")?,
            end_date: parse_form_datetime(&self.end_date, "end_date")?,
        })
    }
}

#[post("/events/create")]
pub async fn create_event(
    client: ClientCtx,
    session: actix_session::Session,
    form: web::Form<EventFormData>,
) -> Result<impl Responder, Error> {
    let form = form.into_inner();
    crate::middleware::csrf::validate_csrf_token(&session, &form.csrf_token)?;
    let owner = client.require_user()?.clone();

    event::create(get_db_pool(), &owner, form.into_new_event()?).await?;

    Ok(HttpResponse::Found()
        .append_header(("Location", "/"))
        .finish())
}

#[post("/events/{event_id}/edit")]
pub async fn update_event(
    client: ClientCtx,
    session: actix_session::Session,
    path: web::Path<i32>,
    form: web::Form<EventFormData>,
) -> Result<impl Responder, Error> {
    let form = form.into_inner();
    crate::middleware::csrf::validate_csrf_token(&session, &form.csrf_token)?;
    client.require_user()?;

    event::edit(get_db_pool(), path.into_inner(), form.into_new_event()?).await?;

    Ok(HttpResponse::Found()
        .append_header(("Location", "/"))
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_datetime_local_without_seconds() {
        let dt = parse_form_datetime("2025-01-10T09:30", "start_date").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-01-10 09:30:00");
    }

    #[test]
    fn parses_datetime_local_with_seconds() {
        assert!(parse_form_datetime("2025-01-10T09:30:15", "start_date").is_ok());
    }

    #[test]
    fn rejects_garbage_and_names_the_field() {
        let err = parse_form_datetime("next tuesday", "end_date").unwrap_err();
        assert!(matches!(
            err,
            OpError::Validation {
                field: "end_date",
                ..
            }
        ));
    }
}
