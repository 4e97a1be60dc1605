//! Web API module for noticeboard.
//!
//! JSON endpoints over `notice_board`, plus the optional cookie-session
//! login routes.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
