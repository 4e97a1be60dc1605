//! Notice board repository.
//!
//! Every statement binds its values; nothing is spliced into the SQL text.
//! `?` placeholders are understood by both the SQLite and MySQL drivers.

use super::types::{NewNoticeEntry, NoticeBoardEntry, NoticeEntryUpdate};
use crate::db::{bind_value, DbPool, SqlValue};
use crate::{NoticeBoardError, Result};

/// Repository for `notice_board` operations.
pub struct NoticeRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> NoticeRepository<'a> {
    /// Create a new NoticeRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// List every row with all of its columns.
    pub async fn list(&self) -> Result<Vec<NoticeBoardEntry>> {
        let rows = sqlx::query("SELECT * FROM notice_board ORDER BY post_no")
            .fetch_all(self.pool)
            .await
            .map_err(|e| NoticeBoardError::Database(e.to_string()))?;

        rows.iter().map(NoticeBoardEntry::from_row).collect()
    }

    /// Get a row by post number.
    pub async fn get(&self, post_no: &SqlValue) -> Result<Option<NoticeBoardEntry>> {
        let row = bind_value(
            sqlx::query("SELECT * FROM notice_board WHERE post_no = ?"),
            post_no,
        )
        .fetch_optional(self.pool)
        .await
        .map_err(|e| NoticeBoardError::Database(e.to_string()))?;

        row.as_ref().map(NoticeBoardEntry::from_row).transpose()
    }

    /// Insert a new row.
    ///
    /// Constraint violations (for example a duplicate `post_no`) surface as
    /// [`NoticeBoardError::Database`].
    pub async fn create(&self, entry: &NewNoticeEntry) -> Result<()> {
        let query = sqlx::query(
            "INSERT INTO notice_board (post_no, author_id, title, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
        );
        let query = bind_value(query, &entry.post_no);
        let query = bind_value(query, &entry.author_id);
        let query = bind_value(query, &entry.title);
        let query = bind_value(query, &entry.content);
        let query = bind_value(query, &entry.created_at);

        query
            .execute(self.pool)
            .await
            .map_err(|e| NoticeBoardError::Database(e.to_string()))?;

        Ok(())
    }

    /// Overwrite the four mutable columns of a row.
    ///
    /// Returns the number of rows affected; zero when `post_no` matches nothing.
    pub async fn update(&self, post_no: &SqlValue, update: &NoticeEntryUpdate) -> Result<u64> {
        let query = sqlx::query(
            "UPDATE notice_board SET author_id = ?, title = ?, content = ?, created_at = ?
             WHERE post_no = ?",
        );
        let query = bind_value(query, &update.author_id);
        let query = bind_value(query, &update.title);
        let query = bind_value(query, &update.content);
        let query = bind_value(query, &update.created_at);
        let query = bind_value(query, post_no);

        let result = query
            .execute(self.pool)
            .await
            .map_err(|e| NoticeBoardError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Delete a row.
    ///
    /// Returns the number of rows affected; zero when `post_no` matches nothing.
    pub async fn delete(&self, post_no: &SqlValue) -> Result<u64> {
        let result = bind_value(sqlx::query("DELETE FROM notice_board WHERE post_no = ?"), post_no)
            .execute(self.pool)
            .await
            .map_err(|e| NoticeBoardError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::db::test_support::fixture_db;
    use crate::Database;
    use serde_json::{json, Value};

    fn sample(post_no: i64) -> NewNoticeEntry {
        NewNoticeEntry::new(post_no)
            .with_author("u1")
            .with_title("t")
            .with_content("c")
            .with_created_at("2024-01-01")
    }

    fn sample_json(post_no: i64) -> Value {
        json!({
            "post_no": post_no,
            "author_id": "u1",
            "title": "t",
            "content": "c",
            "created_at": "2024-01-01"
        })
    }

    fn as_json(entry: &NoticeBoardEntry) -> Value {
        serde_json::to_value(entry).unwrap()
    }

    #[tokio::test]
    async fn test_list_empty() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());

        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());

        repo.create(&sample(1)).await.unwrap();

        let rows = repo.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(as_json(&rows[0]), sample_json(1));
    }

    #[tokio::test]
    async fn test_list_ordered_by_post_no() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());

        repo.create(&sample(3)).await.unwrap();
        repo.create(&sample(1)).await.unwrap();
        repo.create(&sample(2)).await.unwrap();

        let numbers: Vec<Value> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .filter_map(|e| e.get("post_no").cloned())
            .collect();
        assert_eq!(numbers, vec![json!(1), json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn test_list_includes_extra_columns() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());
        sqlx::query("ALTER TABLE notice_board ADD COLUMN views INTEGER DEFAULT 0")
            .execute(db.pool())
            .await
            .unwrap();

        repo.create(&sample(1)).await.unwrap();

        let rows = repo.list().await.unwrap();
        let columns: Vec<&str> = rows[0].columns().collect();
        assert_eq!(
            columns,
            vec!["post_no", "author_id", "title", "content", "created_at", "views"]
        );
        assert_eq!(rows[0].get("views"), Some(&json!(0)));
    }

    #[tokio::test]
    async fn test_create_with_nulls() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());

        repo.create(&NewNoticeEntry::new(9)).await.unwrap();

        let row = repo.get(&SqlValue::Int(9)).await.unwrap().unwrap();
        assert_eq!(row.get("author_id"), Some(&Value::Null));
        assert_eq!(row.get("created_at"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_create_binds_values_as_sent() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());

        // Text post number coerces against the INTEGER key; the numeric
        // author is stored as given under TEXT affinity.
        repo.create(&NewNoticeEntry::new("20").with_author(5))
            .await
            .unwrap();

        let row = repo.get(&SqlValue::Int(20)).await.unwrap().unwrap();
        assert_eq!(row.get("post_no"), Some(&json!(20)));
        assert_eq!(row.get("author_id"), Some(&json!("5")));
    }

    #[tokio::test]
    async fn test_create_duplicate_post_no() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());

        repo.create(&sample(1)).await.unwrap();
        let result = repo.create(&sample(1)).await;

        assert!(matches!(result, Err(NoticeBoardError::Database(_))));
    }

    #[tokio::test]
    async fn test_create_non_integer_post_no_is_database_error() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());

        let result = repo.create(&NewNoticeEntry::new("abc")).await;

        assert!(matches!(result, Err(NoticeBoardError::Database(_))));
    }

    #[tokio::test]
    async fn test_create_is_not_injectable() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());

        let hostile = sample(1).with_title("x'); DROP TABLE notice_board; --");
        repo.create(&hostile).await.unwrap();

        let row = repo.get(&SqlValue::Int(1)).await.unwrap().unwrap();
        assert_eq!(
            row.get("title"),
            Some(&json!("x'); DROP TABLE notice_board; --"))
        );
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_only_target_row() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());

        repo.create(&sample(1)).await.unwrap();
        repo.create(&sample(2)).await.unwrap();

        let update = NoticeEntryUpdate {
            author_id: "u2".into(),
            title: "new title".into(),
            content: "new content".into(),
            created_at: "2024-02-02".into(),
        };
        let affected = repo.update(&SqlValue::from("1"), &update).await.unwrap();
        assert_eq!(affected, 1);

        let updated = repo.get(&SqlValue::Int(1)).await.unwrap().unwrap();
        assert_eq!(
            as_json(&updated),
            json!({
                "post_no": 1,
                "author_id": "u2",
                "title": "new title",
                "content": "new content",
                "created_at": "2024-02-02"
            })
        );

        let untouched = repo.get(&SqlValue::Int(2)).await.unwrap().unwrap();
        assert_eq!(as_json(&untouched), sample_json(2));
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());

        let affected = repo
            .update(&SqlValue::Int(404), &NoticeEntryUpdate::default())
            .await
            .unwrap();
        assert_eq!(affected, 0);

        let affected = repo
            .update(&SqlValue::from("abc"), &NoticeEntryUpdate::default())
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = fixture_db().await;
        let repo = NoticeRepository::new(db.pool());

        repo.create(&sample(1)).await.unwrap();
        repo.create(&sample(2)).await.unwrap();

        assert_eq!(repo.delete(&SqlValue::from("1")).await.unwrap(), 1);
        assert!(repo.get(&SqlValue::Int(1)).await.unwrap().is_none());
        assert_eq!(repo.list().await.unwrap().len(), 1);

        assert_eq!(repo.delete(&SqlValue::Int(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_table_is_database_error() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = NoticeRepository::new(db.pool());

        let result = repo.list().await;
        assert!(matches!(result, Err(NoticeBoardError::Database(_))));
    }
}
