//! API layer - HTTP endpoints and middleware

pub mod convert;
pub mod download;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;

pub use router::{create_router, RouterOptions};
pub use state::AppState;
