// src/auth/service.rs

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;

use super::jwt::create_token;
use super::models::{AuthResponse, LoginRequest, SignupRequest, User, UserWithPassword};
use super::password::{hash_password, verify_password};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct AuthService {
    db: SqlitePool,
}

impl AuthService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn signup(&self, req: SignupRequest) -> Result<AuthResponse, AuthError> {
        if self.email_exists(&req.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&req.password)?;
        let now = Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, phone, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&password_hash)
        .bind(now)
        .execute(&self.db)
        .await?;

        let user = self.get_user_by_id(result.last_insert_rowid()).await?;
        let token = create_token(user.id, &user.name)?;

        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        let user = self
            .get_user_by_email(&req.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(&req.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = create_token(user.id, &user.name)?;

        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        let users =
            sqlx::query_as::<_, User>("SELECT id, name, email, phone FROM users ORDER BY id")
                .fetch_all(&self.db)
                .await?;

        Ok(users)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, AuthError> {
        let user = sqlx::query_as::<_, UserWithPassword>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: i64) -> Result<UserWithPassword, AuthError> {
        sqlx::query_as::<_, UserWithPassword>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.db)
            .await?;

        Ok(count.0 > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_service() -> AuthService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init_schema(&pool).await.unwrap();
        AuthService::new(pool)
    }

    fn signup_req(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Asha".to_string(),
            email: email.to_string(),
            phone: None,
            password: "hunter22".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let service = setup_service().await;

        let created = service.signup(signup_req("asha@example.com")).await.unwrap();
        assert_eq!(created.user.email, "asha@example.com");
        assert!(!created.token.is_empty());

        let logged_in = service
            .login(LoginRequest {
                email: "asha@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, created.user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let service = setup_service().await;

        service.signup(signup_req("asha@example.com")).await.unwrap();
        let err = service.signup(signup_req("asha@example.com")).await;
        assert!(matches!(err, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let service = setup_service().await;

        service.signup(signup_req("asha@example.com")).await.unwrap();
        let err = service
            .login(LoginRequest {
                email: "asha@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(err, Err(AuthError::InvalidCredentials)));

        let err = service
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await;
        assert!(matches!(err, Err(AuthError::UserNotFound)));
    }
}
