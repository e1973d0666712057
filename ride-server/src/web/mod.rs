//! Web layer for the ride booking proxy.
//!
//! JSON endpoints under `/api/rides`, each acting on the caller's own
//! ride session, plus a banner and a health check.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
