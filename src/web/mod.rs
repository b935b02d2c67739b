pub mod error;
pub mod event;
pub mod index;
pub mod login;
pub mod logout;
pub mod post;
pub mod static_pages;

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4.0.1/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Route resolution stops at the first match; keep order deliberate.
    index::configure(conf);
    event::configure(conf);
    login::configure(conf);
    logout::configure(conf);
    post::configure(conf);
    static_pages::configure(conf);
}
