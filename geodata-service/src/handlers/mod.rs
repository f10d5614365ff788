//! HTTP handlers for the geodata service.

pub mod chat;
pub mod health;
pub mod layers;
pub mod pollution;
