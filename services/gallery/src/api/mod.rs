//! Gallery HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and the shared error and payload types. All
//! domain rules live in `crate::service`; handlers only extract, delegate, and
//! shape responses.
pub mod albums;
pub mod error;
pub mod openapi;
pub mod photos;
pub mod session;
pub mod system;
pub mod types;
