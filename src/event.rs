//! Event manager: calendar events tied to an owning user.
//!
//! Deliberately small surface: list, create and edit. There is no event
//! delete; that scope limit is inherited from the source system.

use crate::error::OpError;
use crate::orm::events;
use crate::user::Profile;
use chrono::NaiveDateTime;
use sea_orm::{entity::*, query::*, DatabaseConnection};

#[derive(Clone, Debug)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

pub(crate) fn validate(event: &NewEvent) -> Result<(), OpError> {
    if event.title.trim().is_empty() {
        return Err(OpError::validation("title", "Event title is required"));
    }
    if event.end_date <= event.start_date {
        return Err(OpError::validation(
            "end_date",
            "End date must be after start date",
        ));
    }
    Ok(())
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<events::Model>, OpError> {
    Ok(events::Entity::find()
        .order_by_asc(events::Column::StartDate)
        .all(db)
        .await?)
}

/// Validates and persists an event owned by the acting user.
pub async fn create(
    db: &DatabaseConnection,
    owner: &Profile,
    new_event: NewEvent,
) -> Result<events::Model, OpError> {
    validate(&new_event)?;

    let event = events::ActiveModel {
        title: Set(new_event.title),
        description: Set(new_event.description),
        start_date: Set(new_event.start_date),
        end_date: Set(new_event.end_date),
        user_id: Set(owner.id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("Event {} created by user {}", event.id, owner.id);
    Ok(event)
}

/// Updates title, description and the date range of an existing event.
/// Ownership does not change through this path.
pub async fn edit(
    db: &DatabaseConnection,
    event_id: i32,
    changes: NewEvent,
) -> Result<events::Model, OpError> {
    validate(&changes)?;

    let existing = events::Entity::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(OpError::NotFound("Event"))?;

    let mut active: events::ActiveModel = existing.into();
    active.title = Set(changes.title);
    active.description = Set(changes.description);
    active.start_date = Set(changes.start_date);
    active.end_date = Set(changes.end_date);

    Ok(active.update(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn event(start: NaiveDateTime, end: NaiveDateTime) -> NewEvent {
        NewEvent {
            title: "Open day".to_owned(),
            description: String::new(),
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn rejects_end_before_start() {
        // Scenario from the contract: 2025-01-10 .. 2025-01-05.
        let err = validate(&event(at(2025, 1, 10), at(2025, 1, 5))).unwrap_err();
        assert!(matches!(
            err,
            OpError::Validation {
                field: "end_date",
                ..
            }
        ));
    }

    #[test]
    fn rejects_end_equal_to_start() {
        let t = at(2025, 1, 10);
        assert!(validate(&event(t, t)).is_err());
    }

    #[test]
    fn accepts_end_after_start() {
        assert!(validate(&event(at(2025, 1, 5), at(2025, 1, 10))).is_ok());
    }

    #[test]
    fn rejects_blank_title() {
        let mut e = event(at(2025, 1, 5), at(2025, 1, 10));
        e.title = "   ".to_owned();
        let err = validate(&e).unwrap_err();
        assert!(matches!(err, OpError::Validation { field: "title", .. }));
    }
}
