//! Request and response models for the geodata service.

pub mod area;
pub mod chat;

pub use area::{AreaQuery, AreaSummary, CityQuery};
pub use chat::{ChatReply, ChatRequest};
