//! Database repository for blog post operations.
//!
//! Provides CRUD operations for posts, including the feed view joined with
//! author and like data.

use crate::database::models::{CreatePost, Post, PostDetail, PostWithAuthor};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for post database operations.
pub struct PostRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> PostRepository<'a> {
    /// Creates a new PostRepository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new post in the database.
    pub async fn create_post(&self, post: CreatePost) -> Result<Post> {
        let now = Utc::now();
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, author_id, title, content, image_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, author_id, title, content, image_url, created_at, updated_at
            "#,
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(post.title)
        .bind(post.content)
        .bind(post.image_url)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(post)
    }

    /// Retrieves a post by its unique identifier.
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, title, content, image_url, created_at, updated_at
            FROM posts WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// Retrieves only the author id of a post.
    ///
    /// Used by the ownership guard, which has no need for the full row.
    pub async fn get_post_author(&self, id: &str) -> Result<Option<String>> {
        let author_id: Option<String> =
            sqlx::query_scalar("SELECT author_id FROM posts WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(author_id)
    }

    /// Lists all posts joined with author email and like count, newest first.
    pub async fn list_posts(&self) -> Result<Vec<PostWithAuthor>> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT
            p.id, p.author_id, p.title, p.content, p.image_url,
            p.created_at, p.updated_at,
            u.email AS author_email,
            COUNT(l.id) AS likes_count
            FROM posts p
            JOIN users u ON p.author_id = u.id
            LEFT JOIN likes l ON l.post_id = p.id
            GROUP BY p.id, u.email
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// Retrieves a single post with author email, like count and whether the
    /// given viewer has liked it.
    ///
    /// # Arguments
    /// * `id` - Post ID
    /// * `viewer_id` - Authenticated viewer, if any; `None` yields
    ///   `user_liked = false`
    pub async fn get_post_detail(
        &self,
        id: &str,
        viewer_id: Option<&str>,
    ) -> Result<Option<PostDetail>> {
        let post = sqlx::query_as::<_, PostDetail>(
            r#"
            SELECT
            p.id, p.author_id, p.title, p.content, p.image_url,
            p.created_at, p.updated_at,
            u.email AS author_email,
            COUNT(DISTINCT l.id) AS likes_count,
            EXISTS(
                SELECT 1 FROM likes lv WHERE lv.post_id = p.id AND lv.user_id = ?
            ) AS user_liked
            FROM posts p
            JOIN users u ON p.author_id = u.id
            LEFT JOIN likes l ON l.post_id = p.id
            WHERE p.id = ?
            GROUP BY p.id, u.email
            "#,
        )
        .bind(viewer_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// Updates a post's title and content, and its image only when a new one
    /// is provided.
    ///
    /// # Returns
    /// The updated Post, or `None` if the post does not exist
    pub async fn update_post(
        &self,
        id: &str,
        title: &str,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Option<Post>> {
        let now = Utc::now();

        let post = if let Some(image_url) = image_url {
            sqlx::query_as::<_, Post>(
                r#"
                UPDATE posts SET title = ?, content = ?, image_url = ?, updated_at = ?
                WHERE id = ?
                RETURNING id, author_id, title, content, image_url, created_at, updated_at
                "#,
            )
            .bind(title)
            .bind(content)
            .bind(image_url)
            .bind(now)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Post>(
                r#"
                UPDATE posts SET title = ?, content = ?, updated_at = ?
                WHERE id = ?
                RETURNING id, author_id, title, content, image_url, created_at, updated_at
                "#,
            )
            .bind(title)
            .bind(content)
            .bind(now)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
        };

        Ok(post)
    }

    /// Deletes a post. Likes and comments cascade.
    pub async fn delete_post(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
