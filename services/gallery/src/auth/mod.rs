//! Caller session and administrator gate.
pub mod session;

pub use session::Session;
