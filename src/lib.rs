//! Data preparation for soccer match statistics.
//!
//! `match_store` reads season match rows out of SQLite, `reshape` turns each
//! match into two team-perspective rows and aggregates per-team results, and
//! `weather` fetches historical observations for a city's coordinates under a
//! fixed call budget.

pub mod http_client;
pub mod locations;
pub mod match_store;
pub mod reshape;
pub mod weather;
