//! Identity gate: resolving principals to user records and the
//! owner-or-admin capability check used before every post mutation.

use crate::error::OpError;
use crate::orm::{events, media, posts, users};
use sea_orm::{entity::*, query::*, DatabaseConnection, TransactionTrait};

/// The resolved acting user for a request. Deliberately excludes the
/// password hash; only the login path touches that column.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_teacher: bool,
    pub is_admin: bool,
}

impl From<users::Model> for Profile {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            is_teacher: model.is_teacher,
            is_admin: model.is_admin,
        }
    }
}

impl Profile {
    pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Self, OpError> {
        users::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(Profile::from)
            .ok_or(OpError::NotFound("User"))
    }

    /// Principal resolution is by unique email match. A principal with no
    /// stored user is NotFound; "not authenticated" never reaches this
    /// component.
    pub async fn get_by_email(db: &DatabaseConnection, email: &str) -> Result<Self, OpError> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?
            .map(Profile::from)
            .ok_or(OpError::NotFound("User"))
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// May this user mutate the given post? Owner or admin.
    pub fn can_modify_post(&self, post: &posts::Model) -> bool {
        self.is_admin || post.user_id == self.id
    }

    /// May this user approve pending posts?
    pub fn can_review(&self) -> bool {
        self.is_teacher || self.is_admin
    }
}

/// Deletes a user together with their authored content: media rows of their
/// posts, the posts, their events, then the user row. Expressed as explicit
/// deletes inside one transaction so the cascade is a testable contract
/// rather than a schema detail. Media files stay in the media store.
pub async fn delete_cascading(db: &DatabaseConnection, user_id: i32) -> Result<(), OpError> {
    let txn = db.begin().await?;

    if users::Entity::find_by_id(user_id).one(&txn).await?.is_none() {
        return Err(OpError::NotFound("User"));
    }

    let post_ids: Vec<i32> = posts::Entity::find()
        .filter(posts::Column::UserId.eq(user_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    if !post_ids.is_empty() {
        media::Entity::delete_many()
            .filter(media::Column::PostId.is_in(post_ids.clone()))
            .exec(&txn)
            .await?;
        posts::Entity::delete_many()
            .filter(posts::Column::Id.is_in(post_ids))
            .exec(&txn)
            .await?;
    }

    events::Entity::delete_many()
        .filter(events::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    users::Entity::delete_by_id(user_id).exec(&txn).await?;
    txn.commit().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(id: i32, is_admin: bool) -> Profile {
        Profile {
            id,
            first_name: "Test".into(),
            last_name: "User".into(),
            email: format!("user{}@example.com", id),
            is_teacher: false,
            is_admin,
        }
    }

    fn post_owned_by(user_id: i32) -> posts::Model {
        posts::Model {
            id: 1,
            title: "t".into(),
            description: "d".into(),
            creation_date: Utc::now().naive_utc(),
            publish_date: None,
            is_pending: true,
            category: None,
            likes: 0,
            view_count: 0,
            user_id,
        }
    }

    #[test]
    fn owner_may_modify_own_post() {
        assert!(profile(7, false).can_modify_post(&post_owned_by(7)));
    }

    #[test]
    fn stranger_may_not_modify() {
        assert!(!profile(8, false).can_modify_post(&post_owned_by(7)));
    }

    #[test]
    fn admin_may_modify_any_post() {
        assert!(profile(99, true).can_modify_post(&post_owned_by(7)));
    }

    #[test]
    fn review_capability_requires_teacher_or_admin() {
        let mut p = profile(1, false);
        assert!(!p.can_review());
        p.is_teacher = true;
        assert!(p.can_review());
    }
}
