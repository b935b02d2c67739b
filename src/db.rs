//! Global database pool and startup schema/seed helpers.

use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connects to the database and stores the pool globally.
/// Panics if the connection fails; the application cannot run without it.
pub async fn init_db(database_url: String) {
    let pool = Database::connect(&database_url)
        .await
        .expect("Failed to connect to the database.");
    DB_POOL.set(pool).expect("init_db called more than once.");
}

pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL.get().expect("DB pool accessed before init_db.")
}

/// Applies the schema at startup. Statements are idempotent so this is safe
/// to run on every boot, matching the original deployment model.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    const STATEMENTS: [&str; 4] = [
        r#"CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            first_name VARCHAR(100) NOT NULL,
            last_name VARCHAR(100) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            phone VARCHAR(50),
            is_teacher BOOLEAN NOT NULL DEFAULT FALSE,
            is_admin BOOLEAN NOT NULL DEFAULT FALSE
        )"#,
        r#"CREATE TABLE IF NOT EXISTS posts (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            creation_date TIMESTAMP NOT NULL,
            publish_date TIMESTAMP,
            is_pending BOOLEAN NOT NULL DEFAULT FALSE,
            category TEXT,
            likes INTEGER NOT NULL DEFAULT 0,
            view_count INTEGER NOT NULL DEFAULT 0,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
        )"#,
        r#"CREATE TABLE IF NOT EXISTS media (
            id SERIAL PRIMARY KEY,
            alt_text TEXT NOT NULL,
            is_video BOOLEAN NOT NULL DEFAULT FALSE,
            file_path TEXT NOT NULL,
            file_size BIGINT NOT NULL DEFAULT 0,
            file_type VARCHAR(255) NOT NULL DEFAULT '',
            post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            uploaded_by_user_id INTEGER NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS events (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            start_date TIMESTAMP NOT NULL,
            end_date TIMESTAMP NOT NULL,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
        )"#,
    ];

    for sql in STATEMENTS {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_string(),
        ))
        .await?;
    }

    Ok(())
}

/// Inserts demo data if it is not already present. Keyed on email/title so
/// repeated boots do not duplicate rows.
pub async fn seed(db: &DatabaseConnection) -> Result<(), DbErr> {
    use crate::orm::{events, media, posts, users};
    use chrono::Utc;
    use sea_orm::{entity::*, query::*};

    async fn ensure_user(
        db: &DatabaseConnection,
        email: &str,
        is_teacher: bool,
        is_admin: bool,
    ) -> Result<users::Model, DbErr> {
        if let Some(existing) = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?
        {
            return Ok(existing);
        }

        let hash = crate::session::hash_password("testhash")
            .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?;

        users::ActiveModel {
            first_name: Set("Test".to_owned()),
            last_name: Set("User".to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set(hash),
            phone: Set(Some("123456789".to_owned())),
            is_teacher: Set(is_teacher),
            is_admin: Set(is_admin),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    let student = ensure_user(db, "test.user@example.com", false, false).await?;
    ensure_user(db, "test.teacher@example.com", true, false).await?;
    ensure_user(db, "test.admin@example.com", true, true).await?;

    let welcome = posts::Entity::find()
        .filter(posts::Column::Title.eq("Welcome Post"))
        .one(db)
        .await?;

    let welcome = match welcome {
        Some(post) => post,
        None => {
            let now = Utc::now().naive_utc();
            posts::ActiveModel {
                title: Set("Welcome Post".to_owned()),
                description: Set("This is the first post.".to_owned()),
                creation_date: Set(now),
                publish_date: Set(Some(now)),
                is_pending: Set(false),
                likes: Set(0),
                view_count: Set(0),
                user_id: Set(student.id),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    let has_media = media::Entity::find()
        .filter(media::Column::PostId.eq(welcome.id))
        .count(db)
        .await?;

    if has_media == 0 {
        media::ActiveModel {
            alt_text: Set("Sample Image".to_owned()),
            is_video: Set(false),
            file_path: Set("/uploads/sample.jpg".to_owned()),
            file_size: Set(0),
            file_type: Set("image/jpeg".to_owned()),
            post_id: Set(welcome.id),
            uploaded_by_user_id: Set(student.id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    let has_event = events::Entity::find()
        .filter(events::Column::Title.eq("Sample Event"))
        .count(db)
        .await?;

    if has_event == 0 {
        let now = Utc::now().naive_utc();
        events::ActiveModel {
            title: Set("Sample Event".to_owned()),
            description: Set("This is a sample event.".to_owned()),
            start_date: Set(now + chrono::Duration::days(7)),
            end_date: Set(now + chrono::Duration::days(10)),
            user_id: Set(student.id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    log::info!("Seed data verified.");
    Ok(())
}
