//! noticeboard - Notice board HTTP API
//!
//! CRUD over the `notice_board` table plus an optional cookie-session
//! login check against `stdinfo`.

#[cfg(all(feature = "sqlite", feature = "mysql"))]
compile_error!("features `sqlite` and `mysql` are mutually exclusive");

#[cfg(not(any(feature = "sqlite", feature = "mysql")))]
compile_error!("one of the features `sqlite` or `mysql` must be enabled");

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod notice;
pub mod web;

pub use auth::{MemorySessionStore, Session, SessionStore, StudentRepository};
pub use config::Config;
pub use db::{Database, DbPool, SqlValue};
pub use error::{NoticeBoardError, Result};
pub use notice::{NewNoticeEntry, NoticeBoardEntry, NoticeEntryUpdate, NoticeRepository};
pub use web::WebServer;
