//! `coworkerd` library crate: job orchestration substrate for a local-first
//! filesystem coworker server. The `coworkerd` binary is a thin bootstrap
//! over these modules; integration tests exercise the same
//! `gateway::router` and `store::SqliteStore` directly.

pub mod audit;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod registry;
pub mod store;
pub mod tools;
pub mod worker;
pub mod workspace;
