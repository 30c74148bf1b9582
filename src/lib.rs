pub mod api;
pub mod auth;
pub mod composer;
pub mod host;
pub mod models;
pub mod reports;
pub mod ui;
pub mod utils;
