//! Platelens API library
//!
//! Exposes the handlers, state, and setup modules so integration tests can
//! build the router the same way the binary does.

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
