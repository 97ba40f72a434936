//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::database::models::NewUser;
use crate::errors::{ServiceError, ServiceResult};
use crate::services::user_service::UserService;
use crate::utils::jwt::JwtUtils;
use sqlx::SqlitePool;
use validator::Validate;

/// Authentication service for registration, login and session lookups.
pub struct AuthService<'a> {
    jwt_utils: JwtUtils,
    user_service: UserService<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, jwt_utils: JwtUtils) -> Self {
        AuthService {
            jwt_utils,
            user_service: UserService::new(pool),
        }
    }

    /// Register a new user and establish a session for them.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthenticatedSession> {
        let user = self
            .user_service
            .create_user(NewUser {
                email: request.email,
                password: request.password,
            })
            .await?;

        let token = self.jwt_utils.generate_token(user.id.clone())?;

        Ok(AuthenticatedSession {
            user: UserInfo {
                id: user.id,
                email: user.email,
            },
            token,
        })
    }

    /// Authenticate a user and establish a session for them.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthenticatedSession> {
        // Validate input
        if let Err(validation_errors) = request.validate() {
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

        let user = self
            .user_service
            .authenticate_user(&request.email, &request.password)
            .await?;

        let token = self.jwt_utils.generate_token(user.id.clone())?;

        Ok(AuthenticatedSession {
            user: UserInfo {
                id: user.id,
                email: user.email,
            },
            token,
        })
    }

    /// Resolve the authenticated subject id back to its user record.
    pub async fn current_user(&self, user_id: &str) -> ServiceResult<UserInfo> {
        let user = self.user_service.get_user_required(user_id).await?;

        Ok(UserInfo {
            id: user.id,
            email: user.email,
        })
    }
}
