pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod openapi;
pub mod providers;
pub mod routes;
pub mod search;
pub mod services;
pub mod state;
pub mod streaming;

pub use axum;
pub use serde_json;
