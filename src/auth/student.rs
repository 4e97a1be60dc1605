//! Student number lookup against `stdinfo`.

use crate::db::{bind_value, DbPool, SqlValue};
use crate::{NoticeBoardError, Result};

/// Repository for the externally owned `stdinfo` table.
pub struct StudentRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> StudentRepository<'a> {
    /// Create a new StudentRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Check whether a student number is registered.
    ///
    /// The number is bound as sent, so `"20240001"` and `20240001` match the
    /// same integer key.
    pub async fn exists(&self, post_no: &SqlValue) -> Result<bool> {
        let query = sqlx::query("SELECT 1 FROM stdinfo WHERE post_no = ? LIMIT 1");
        let row = bind_value(query, post_no)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| NoticeBoardError::Database(e.to_string()))?;

        Ok(row.is_some())
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::db::test_support::{add_student, fixture_db};
    use crate::Database;

    #[tokio::test]
    async fn test_exists() {
        let db = fixture_db().await;
        add_student(&db, 20240001, "Kim").await;
        let repo = StudentRepository::new(db.pool());

        assert!(repo.exists(&SqlValue::Int(20240001)).await.unwrap());
        assert!(!repo.exists(&SqlValue::Int(20240002)).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_with_text_number() {
        let db = fixture_db().await;
        add_student(&db, 20240001, "Kim").await;
        let repo = StudentRepository::new(db.pool());

        assert!(repo.exists(&SqlValue::from("20240001")).await.unwrap());
        assert!(!repo.exists(&SqlValue::from("abc")).await.unwrap());
        assert!(!repo.exists(&SqlValue::Null).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_table() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = StudentRepository::new(db.pool());

        assert!(matches!(
            repo.exists(&SqlValue::Int(1)).await,
            Err(NoticeBoardError::Database(_))
        ));
    }
}
