//! Vox API crate - axum HTTP gateway for the voice-assistant frontend.
//!
//! Exposes the status, history, ask and text-to-speech endpoints over the
//! conversation engine and speech adapter.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
