pub mod api;
pub mod app_config;
pub mod db;
pub mod error;
pub mod event;
pub mod filesystem;
pub mod middleware;
pub mod orm;
pub mod post;
pub mod session;
pub mod storage;
pub mod user;
pub mod web;
