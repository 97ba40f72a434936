//! Database repository for post comments.

use crate::database::models::{Comment, CommentWithAuthor};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for comment database operations.
pub struct CommentRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> CommentRepository<'a> {
    /// Creates a new CommentRepository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Adds a comment to a post.
    pub async fn add_comment(
        &self,
        id: &str,
        post_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, user_id, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, post_id, user_id, content, created_at
            "#,
        )
        .bind(id)
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(comment)
    }

    /// Lists a post's comments joined with commenter email, newest first.
    pub async fn get_comments_for_post(&self, post_id: &str) -> Result<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT
            c.id, c.post_id, c.user_id, c.content, c.created_at,
            u.email AS user_email
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.post_id = ?
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;

        Ok(comments)
    }
}
