//! Post business logic service.
//!
//! Handles post CRUD plus likes and comments.

use crate::api::post::models::{CommentRequest, CreatePostRequest, UpdatePostRequest};
use crate::database::is_unique_violation;
use crate::database::models::{
    Comment, CommentWithAuthor, CreatePost, Post, PostDetail, PostWithAuthor,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::comment_repository::CommentRepository;
use crate::repositories::like_repository::LikeRepository;
use crate::repositories::post_repository::PostRepository;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct PostService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> PostService<'a> {
    /// Creates a new PostService instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new post authored by the given user.
    pub async fn create_post(
        &self,
        author_id: &str,
        request: CreatePostRequest,
    ) -> ServiceResult<Post> {
        let repo = PostRepository::new(self.pool);
        let post = repo
            .create_post(CreatePost {
                id: Uuid::now_v7().to_string(),
                author_id: author_id.to_string(),
                title: request.title,
                content: request.content,
                image_url: request.image_url,
            })
            .await?;

        Ok(post)
    }

    /// Lists all posts for the feed, newest first.
    pub async fn get_feed(&self) -> ServiceResult<Vec<PostWithAuthor>> {
        let repo = PostRepository::new(self.pool);
        Ok(repo.list_posts().await?)
    }

    /// Retrieves a single post view, personalized for the viewer if one is
    /// authenticated.
    pub async fn get_post_detail(
        &self,
        post_id: &str,
        viewer_id: Option<&str>,
    ) -> ServiceResult<PostDetail> {
        let repo = PostRepository::new(self.pool);
        let post = repo
            .get_post_detail(post_id, viewer_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id))?;

        Ok(post)
    }

    /// Retrieves a post by ID with existence verification.
    pub async fn get_post_required(&self, post_id: &str) -> ServiceResult<Post> {
        let repo = PostRepository::new(self.pool);
        let post = repo
            .get_post(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id))?;

        Ok(post)
    }

    /// Updates a post's title, content and (when provided) image.
    ///
    /// Authorship has already been enforced by the ownership guard.
    pub async fn update_post(
        &self,
        post_id: &str,
        request: UpdatePostRequest,
    ) -> ServiceResult<Post> {
        let repo = PostRepository::new(self.pool);
        let post = repo
            .update_post(
                post_id,
                &request.title,
                &request.content,
                request.image_url.as_deref(),
            )
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id))?;

        Ok(post)
    }

    /// Deletes a post along with its likes and comments.
    pub async fn delete_post(&self, post_id: &str) -> ServiceResult<()> {
        let repo = PostRepository::new(self.pool);
        repo.delete_post(post_id).await?;
        Ok(())
    }

    /// Records a like on a post.
    pub async fn like_post(&self, post_id: &str, user_id: &str) -> ServiceResult<()> {
        self.ensure_post_exists(post_id).await?;

        let repo = LikeRepository::new(self.pool);
        match repo
            .add_like(&Uuid::now_v7().to_string(), post_id, user_id)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if is_unique_violation(&e) => {
                Err(ServiceError::already_exists("Like", post_id))
            }
            Err(e) => Err(ServiceError::Database { source: e }),
        }
    }

    /// Removes a like from a post. Succeeds whether or not the like existed.
    pub async fn unlike_post(&self, post_id: &str, user_id: &str) -> ServiceResult<()> {
        let repo = LikeRepository::new(self.pool);
        repo.remove_like(post_id, user_id).await?;
        Ok(())
    }

    /// Adds a comment to a post.
    pub async fn add_comment(
        &self,
        post_id: &str,
        user_id: &str,
        request: CommentRequest,
    ) -> ServiceResult<Comment> {
        self.ensure_post_exists(post_id).await?;

        let repo = CommentRepository::new(self.pool);
        let comment = repo
            .add_comment(
                &Uuid::now_v7().to_string(),
                post_id,
                user_id,
                &request.content,
            )
            .await?;

        Ok(comment)
    }

    /// Lists a post's comments, newest first.
    pub async fn get_comments(&self, post_id: &str) -> ServiceResult<Vec<CommentWithAuthor>> {
        let repo = CommentRepository::new(self.pool);
        Ok(repo.get_comments_for_post(post_id).await?)
    }

    async fn ensure_post_exists(&self, post_id: &str) -> ServiceResult<()> {
        let repo = PostRepository::new(self.pool);
        if repo.get_post_author(post_id).await?.is_none() {
            return Err(ServiceError::not_found("Post", post_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::CreateUser;
    use crate::repositories::user_repository::UserRepository;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory database");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations apply");
        pool
    }

    async fn seed_user(pool: &SqlitePool, id: &str, email: &str) {
        UserRepository::new(pool)
            .create_user(CreateUser {
                id: id.to_string(),
                email: email.to_string(),
                password_hash: "$2b$12$not-a-real-hash".to_string(),
            })
            .await
            .expect("user inserted");
    }

    fn post_request(title: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            content: "<p>Hello world</p>".to_string(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_feed() {
        let pool = test_pool().await;
        seed_user(&pool, "author-1", "a@x.com").await;
        let service = PostService::new(&pool);

        let post = service
            .create_post("author-1", post_request("First"))
            .await
            .expect("post created");
        assert_eq!(post.author_id, "author-1");

        let feed = service.get_feed().await.expect("feed loads");
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].author_email, "a@x.com");
        assert_eq!(feed[0].likes_count, 0);
    }

    #[tokio::test]
    async fn test_likes_and_detail() {
        let pool = test_pool().await;
        seed_user(&pool, "author-1", "a@x.com").await;
        seed_user(&pool, "reader-1", "b@x.com").await;
        let service = PostService::new(&pool);

        let post = service
            .create_post("author-1", post_request("Liked"))
            .await
            .expect("post created");

        service
            .like_post(&post.id, "reader-1")
            .await
            .expect("like recorded");

        let err = service
            .like_post(&post.id, "reader-1")
            .await
            .expect_err("second like conflicts");
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));

        let as_liker = service
            .get_post_detail(&post.id, Some("reader-1"))
            .await
            .expect("detail loads");
        assert_eq!(as_liker.likes_count, 1);
        assert!(as_liker.user_liked);

        let as_author = service
            .get_post_detail(&post.id, Some("author-1"))
            .await
            .expect("detail loads");
        assert!(!as_author.user_liked);

        let anonymous = service
            .get_post_detail(&post.id, None)
            .await
            .expect("detail loads");
        assert!(!anonymous.user_liked);

        // Unlike is idempotent.
        service.unlike_post(&post.id, "reader-1").await.expect("unlike");
        service.unlike_post(&post.id, "reader-1").await.expect("unlike again");
        let after = service
            .get_post_detail(&post.id, Some("reader-1"))
            .await
            .expect("detail loads");
        assert_eq!(after.likes_count, 0);
    }

    #[tokio::test]
    async fn test_like_missing_post() {
        let pool = test_pool().await;
        seed_user(&pool, "reader-1", "b@x.com").await;
        let service = PostService::new(&pool);

        let err = service
            .like_post("no-such-post", "reader-1")
            .await
            .expect_err("missing post is not found");
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_preserves_image_when_absent() {
        let pool = test_pool().await;
        seed_user(&pool, "author-1", "a@x.com").await;
        let service = PostService::new(&pool);

        let post = service
            .create_post(
                "author-1",
                CreatePostRequest {
                    title: "With image".to_string(),
                    content: "body".to_string(),
                    image_url: Some("/uploads/cover.png".to_string()),
                },
            )
            .await
            .expect("post created");

        let updated = service
            .update_post(
                &post.id,
                UpdatePostRequest {
                    title: "New title".to_string(),
                    content: "new body".to_string(),
                    image_url: None,
                },
            )
            .await
            .expect("update succeeds");
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.image_url.as_deref(), Some("/uploads/cover.png"));

        let replaced = service
            .update_post(
                &post.id,
                UpdatePostRequest {
                    title: "New title".to_string(),
                    content: "new body".to_string(),
                    image_url: Some("/uploads/other.png".to_string()),
                },
            )
            .await
            .expect("update succeeds");
        assert_eq!(replaced.image_url.as_deref(), Some("/uploads/other.png"));
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let pool = test_pool().await;
        seed_user(&pool, "author-1", "a@x.com").await;
        seed_user(&pool, "reader-1", "b@x.com").await;
        let service = PostService::new(&pool);

        let post = service
            .create_post("author-1", post_request("Doomed"))
            .await
            .expect("post created");
        service.like_post(&post.id, "reader-1").await.expect("like");
        service
            .add_comment(
                &post.id,
                "reader-1",
                CommentRequest {
                    content: "nice".to_string(),
                },
            )
            .await
            .expect("comment added");

        service.delete_post(&post.id).await.expect("delete succeeds");

        let err = service
            .get_post_detail(&post.id, None)
            .await
            .expect_err("post is gone");
        assert!(matches!(err, ServiceError::NotFound { .. }));
        let comments = service.get_comments(&post.id).await.expect("list loads");
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn test_comments() {
        let pool = test_pool().await;
        seed_user(&pool, "author-1", "a@x.com").await;
        seed_user(&pool, "reader-1", "b@x.com").await;
        let service = PostService::new(&pool);

        let post = service
            .create_post("author-1", post_request("Discussed"))
            .await
            .expect("post created");

        let comment = service
            .add_comment(
                &post.id,
                "reader-1",
                CommentRequest {
                    content: "first!".to_string(),
                },
            )
            .await
            .expect("comment added");
        assert_eq!(comment.post_id, post.id);

        let comments = service.get_comments(&post.id).await.expect("list loads");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].user_email, "b@x.com");

        let err = service
            .add_comment(
                "no-such-post",
                "reader-1",
                CommentRequest {
                    content: "lost".to_string(),
                },
            )
            .await
            .expect_err("missing post is not found");
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
