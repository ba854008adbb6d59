pub mod auth;
pub mod client;
pub mod conversations;
pub mod discover;
pub mod matches;
pub mod profile;
pub mod safety;

pub use client::{ApiClient, ApiError};
