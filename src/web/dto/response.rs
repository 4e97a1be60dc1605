//! Response DTOs for Web API.

use serde::Serialize;

/// Success message body, e.g. `{"message": "Data inserted successfully"}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: &'static str,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Body of `GET /api/check-login`.
#[derive(Debug, Serialize)]
pub struct CheckLoginResponse {
    /// Whether the session holds a student number.
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
}
