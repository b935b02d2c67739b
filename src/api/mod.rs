//! JSON CRUD surface consumed by the companion mobile client.
//!
//! Unlike the page actions these endpoints speak plain entity JSON and use
//! HTTP status codes plus a `message` body for their outcomes.

pub mod events;
pub mod media;
pub mod posts;
pub mod users;

use actix_web::web::ServiceConfig;

pub fn configure(conf: &mut ServiceConfig) {
    users::configure(conf);
    posts::configure(conf);
    media::configure(conf);
    events::configure(conf);
}
