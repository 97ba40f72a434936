//! User business logic service.
//!
//! Handles registration and credential checks.

use crate::database::is_unique_violation;
use crate::database::models::{CreateUser, NewUser, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user with full validation.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Validation failures
    /// - An email that is already registered
    pub async fn create_user(&self, new_user: NewUser) -> ServiceResult<User> {
        // Input validation using validator crate
        if let Err(validation_errors) = new_user.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();

            return Err(ServiceError::validation(error_messages.join(", ")));
        }

        let repo = UserRepository::new(self.pool);

        // Friendly conflict on the common path; the unique index below is
        // what actually guarantees uniqueness.
        if repo.email_exists(&new_user.email).await? {
            return Err(ServiceError::already_exists("User", &new_user.email));
        }

        let password_hash = Self::hash_password(&new_user.password)?;

        let data = CreateUser {
            id: Uuid::now_v7().to_string(),
            email: new_user.email,
            password_hash,
        };

        match repo.create_user(data).await {
            Ok(user) => Ok(user),
            // Lost the race against a concurrent insert of the same email.
            Err(e) if is_unique_violation(&e) => {
                Err(ServiceError::already_exists("User", "email"))
            }
            Err(e) => Err(ServiceError::Database { source: e }),
        }
    }

    /// Checks a user's credentials.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn authenticate_user(&self, email: &str, password: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);

        let user = match repo.get_user_by_email(email).await? {
            Some(user) => user,
            None => return Err(ServiceError::InvalidCredentials),
        };

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Retrieves a user by ID with existence verification.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if the user doesn't exist
    pub async fn get_user_required(&self, id: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(user)
    }

    /// Function to hash a password before storing in database
    fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Function to verify a password against the stored hash
    fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash).map_err(|e| {
            ServiceError::internal_error(format!("Password verification failed: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    // Each `sqlite::memory:` connection is its own database, so the test
    // pool is capped at a single connection.
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

    fn new_user(email: &str, password: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_duplicate_conflicts() {
        let pool = test_pool().await;
        let service = UserService::new(&pool);

        let user = service
            .create_user(new_user("a@x.com", "pw1"))
            .await
            .expect("first registration succeeds");
        assert_eq!(user.email, "a@x.com");
        assert_ne!(user.password_hash, "pw1");

        let err = service
            .create_user(new_user("a@x.com", "pw2"))
            .await
            .expect_err("second registration with the same email fails");
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let pool = test_pool().await;
        let service = UserService::new(&pool);

        let err = service
            .create_user(new_user("not-an-email", "pw"))
            .await
            .expect_err("invalid email fails validation");
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_user() {
        let pool = test_pool().await;
        let service = UserService::new(&pool);

        let registered = service
            .create_user(new_user("a@x.com", "pw1"))
            .await
            .expect("registration succeeds");

        let user = service
            .authenticate_user("a@x.com", "pw1")
            .await
            .expect("correct password authenticates");
        assert_eq!(user.id, registered.id);

        // Wrong password and unknown email are indistinguishable.
        let wrong_password = service
            .authenticate_user("a@x.com", "wrong")
            .await
            .expect_err("wrong password fails");
        let unknown_email = service
            .authenticate_user("b@x.com", "pw1")
            .await
            .expect_err("unknown email fails");
        assert!(matches!(wrong_password, ServiceError::InvalidCredentials));
        assert!(matches!(unknown_email, ServiceError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_get_user_required_missing() {
        let pool = test_pool().await;
        let service = UserService::new(&pool);

        let err = service
            .get_user_required("no-such-id")
            .await
            .expect_err("missing user is not found");
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
