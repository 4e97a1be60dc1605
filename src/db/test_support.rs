//! Table fixtures for unit tests.
//!
//! Stand-ins for the externally owned schema, close enough for the queries
//! this crate issues.

use super::Database;

pub(crate) const FIXTURE_SCHEMA: &str = r#"
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

/// Open an in-memory database with both tables created.
pub(crate) async fn fixture_db() -> Database {
    let db = Database::open_in_memory().await.unwrap();
    sqlx::raw_sql(FIXTURE_SCHEMA)
        .execute(db.pool())
        .await
        .unwrap();
    db
}

/// Register a student number in `stdinfo`.
pub(crate) async fn add_student(db: &Database, post_no: i64, name: &str) {
    sqlx::query("INSERT INTO stdinfo (post_no, name) VALUES (?, ?)")
        .bind(post_no)
        .bind(name)
        .execute(db.pool())
        .await
        .unwrap();
}
