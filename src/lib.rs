//! Leanurls - a lean URL shortener
//!
//! Authenticated users create short links, anyone can follow them, and every
//! follow is recorded as a hit that feeds the owner's analytics.
//!
//! # Architecture
//! - `storage`: relational persistence of users, links and hits
//! - `services`: link, analytics and user operations
//! - `auth`: bearer token verification
//! - `api`: HTTP routes and middleware
//! - `config`: static configuration
//! - `runtime`: application lifecycle
//! - `system`: logging setup

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
