/// Authentication service - signup, login and logout over cookie sessions
use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::db::{session_repo, user_repo};
use crate::error::Result;
use crate::models::{Session, User};
use crate::security;

/// Outcome of a signup attempt that failed a uniqueness check.
#[derive(Debug, PartialEq, Eq)]
pub enum SignupRejection {
    UsernameTaken,
}

pub struct AuthService {
    pool: PgPool,
    session_lifetime_days: i64,
}

impl AuthService {
    pub fn new(pool: PgPool, session_lifetime_days: i64) -> Self {
        Self {
            pool,
            session_lifetime_days,
        }
    }

    /// Register a new user. Shape validation happens in the form layer;
    /// this enforces username uniqueness and hashes the password.
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
    ) -> Result<std::result::Result<User, SignupRejection>> {
        if user_repo::username_exists(&self.pool, username).await? {
            return Ok(Err(SignupRejection::UsernameTaken));
        }

        let password_hash = security::hash_password(password)?;
        let user = user_repo::create_user(&self.pool, username, &password_hash).await?;
        tracing::info!(user_id = %user.id, "user registered");

        Ok(Ok(user))
    }

    /// Verify credentials and open a session. `None` means bad credentials;
    /// the caller re-renders the login form.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<(User, Session)>> {
        let Some(user) = user_repo::find_by_username(&self.pool, username).await? else {
            return Ok(None);
        };

        if !security::verify_password(password, &user.password_hash)? {
            return Ok(None);
        }

        let token = security::generate_session_token();
        let expires_at = Utc::now() + Duration::days(self.session_lifetime_days);
        let session = session_repo::create_session(&self.pool, user.id, &token, expires_at).await?;
        tracing::info!(user_id = %user.id, "login");

        Ok(Some((user, session)))
    }

    /// Drop the session behind a cookie token; unknown tokens are a no-op.
    pub async fn logout(&self, token: &str) -> Result<()> {
        session_repo::delete_session(&self.pool, token).await?;
        Ok(())
    }
}
