//! Service layer
//!
//! Business rules shared by the HTTP handlers and the CLI; handlers stay
//! thin and pass the caller's [`crate::auth::Identity`] in explicitly.

pub mod alias;
mod analytics_service;
mod link_service;
mod user_service;

pub use analytics_service::*;
pub use link_service::*;
pub use user_service::*;
