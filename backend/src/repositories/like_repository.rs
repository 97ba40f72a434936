//! Database repository for post likes.

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for like database operations.
pub struct LikeRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> LikeRepository<'a> {
    /// Creates a new LikeRepository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Records that a user likes a post.
    ///
    /// The (post_id, user_id) pair carries a unique index; liking the same
    /// post twice surfaces a unique-constraint violation to the caller.
    pub async fn add_like(&self, id: &str, post_id: &str, user_id: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO likes (id, post_id, user_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(post_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Removes a user's like from a post. Removing a like that does not
    /// exist is a no-op.
    pub async fn remove_like(&self, post_id: &str, user_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
