//! Real-time text chat relay over WebSockets.
//!
//! Every message a client sends is broadcast to all connected clients, a
//! bounded scroll-back log replayed on join, and optionally an append-only
//! transcript file.

pub mod chat;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{AppErr, AppResult};
pub use state::ChatState;
