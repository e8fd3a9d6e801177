//! School gallery service library crate.
//!
//! # Purpose
//! Exposes the gallery HTTP API, the album/photo service, upload handling,
//! configuration, and store backends for use by the binary and tests.
//!
//! # Notes
//! Module boundaries follow the request path: `api` → `service` → `store`,
//! with `uploads` owning everything that touches photo files on disk.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod model;
pub mod observability;
pub mod sanitize;
pub mod service;
pub mod store;
#[cfg(test)]
mod test_env;
pub mod uploads;
