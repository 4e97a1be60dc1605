//! Authentication module for noticeboard.
//!
//! "Login" here means presenting a `post_no` that exists in `stdinfo`.
//! There are no passwords; the session merely remembers which number was
//! presented.

mod session;
mod student;

pub use session::{
    MemorySessionStore, Session, SessionStore, DEFAULT_SESSION_MAX_AGE_SECS,
};
pub use student::StudentRepository;
