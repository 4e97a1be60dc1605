//! Request DTOs for Web API.
//!
//! Only the JSON shape is checked here. Each field accepts any JSON scalar
//! and is bound as sent; a missing field is passed to the database as NULL.

use serde::Deserialize;

use crate::db::SqlValue;
use crate::notice::{NewNoticeEntry, NoticeEntryUpdate};

/// Body of `POST /api/data`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateNoticeRequest {
    /// Post number.
    pub post_no: SqlValue,
    /// Author identifier.
    pub author_id: SqlValue,
    /// Title.
    pub title: SqlValue,
    /// Body.
    pub content: SqlValue,
    /// Client-supplied creation timestamp.
    pub created_at: SqlValue,
}

impl From<CreateNoticeRequest> for NewNoticeEntry {
    fn from(req: CreateNoticeRequest) -> Self {
        Self {
            post_no: req.post_no,
            author_id: req.author_id,
            title: req.title,
            content: req.content,
            created_at: req.created_at,
        }
    }
}

/// Body of `PUT /api/data/:post_no`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateNoticeRequest {
    /// Author identifier.
    pub author_id: SqlValue,
    /// Title.
    pub title: SqlValue,
    /// Body.
    pub content: SqlValue,
    /// Creation timestamp.
    pub created_at: SqlValue,
}

impl From<UpdateNoticeRequest> for NoticeEntryUpdate {
    fn from(req: UpdateNoticeRequest) -> Self {
        Self {
            author_id: req.author_id,
            title: req.title,
            content: req.content,
            created_at: req.created_at,
        }
    }
}

/// Body of `POST /api/login`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// Student number to look up in `stdinfo`.
    pub post_no: SqlValue,
}
