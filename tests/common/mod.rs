//! Test helpers for Web API tests.
//!
//! Builds the router over an in-memory SQLite database holding stand-ins
//! for the `notice_board` and `stdinfo` tables.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use noticeboard::config::WebConfig;
use noticeboard::web::handlers::AppState;
use noticeboard::web::middleware::SessionState;
use noticeboard::web::router::create_router;
use noticeboard::Database;

/// Student number registered in every fixture database.
pub const KNOWN_STUDENT: i64 = 20240001;

const SCHEMA: &str = r#"
CREATE TABLE notice_board (
    post_no     INTEGER PRIMARY KEY,
    author_id   TEXT,
    title       TEXT,
    content     TEXT,
    created_at  TEXT
);

CREATE TABLE stdinfo (
    post_no     INTEGER PRIMARY KEY,
    name        TEXT
);
"#;

/// Create a test configuration.
pub fn create_test_config() -> WebConfig {
    WebConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        session_secret: "test-session-secret-for-testing-only".to_string(),
        ..Default::default()
    }
}

/// Open an in-memory database with both tables and one student.
pub async fn fixture_db() -> Database {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    sqlx::raw_sql(SCHEMA)
        .execute(db.pool())
        .await
        .expect("Failed to create tables");
    sqlx::query("INSERT INTO stdinfo (post_no, name) VALUES (?, ?)")
        .bind(KNOWN_STUDENT)
        .bind("Test Student")
        .execute(db.pool())
        .await
        .expect("Failed to insert student");
    db
}

/// Create a test server over `db`.
///
/// Cookies are saved between requests, so consecutive calls share a session.
pub fn create_test_server(db: Database, config: &WebConfig) -> TestServer {
    let app_state = Arc::new(AppState::new(db));
    let session_state = config
        .login_enabled
        .then(|| Arc::new(SessionState::from_config(config)));

    let router = create_router(app_state, session_state, &config.cors_origins);

    let mut server = TestServer::new(router).expect("Failed to create test server");
    server.save_cookies();
    server
}
