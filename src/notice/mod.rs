//! Notice board module.
//!
//! Rows of the externally owned `notice_board` table and the repository that
//! reads and writes them. There is no authorization at this layer.

mod repository;
mod types;

pub use repository::NoticeRepository;
pub use types::{NewNoticeEntry, NoticeBoardEntry, NoticeEntryUpdate};
