pub mod config;
pub mod db;
pub mod dispatch;
pub mod errors;
pub mod jobs;
pub mod lifecycle;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
