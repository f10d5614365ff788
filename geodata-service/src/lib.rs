//! geodata-service: HTTP API over processed community-area layers.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
