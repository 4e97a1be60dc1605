//! API handlers for the notice board.

pub mod auth;
pub mod notice;

pub use auth::*;
pub use notice::*;

use crate::Database;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}
