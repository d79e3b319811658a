//! Personal finance backend.
//!
//! A REST API over PostgreSQL for recording income and expense transactions grouped into
//! categories. Client applications authenticate with API keys issued through an
//! admin-only surface.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: API keys stored as SHA-256 digests; shared admin secret
//! - **Format**: JSON envelope `{status, message, data}`

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
