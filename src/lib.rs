//! Campus events API.
//!
//! Clubs publish events, students search and register for them, and the
//! explore page shows what is trending. Trending is ranked from raw
//! registrations (see [`trending`]) and cached for fifteen minutes behind a
//! cache-aside gate; a broken cache only costs a recomputation.

pub mod auth;
pub mod cache;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod trending;
pub mod utils;
