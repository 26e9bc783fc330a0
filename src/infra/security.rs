//! Authentication of users.
//!
//! A [`User`] can be extracted from a request either from the view layer's
//! session or from a basic auth header, both backed by the same users table.

use super::{
    database::DbPool,
    error::{ApiError, ApiResult, ClientError, InternalError},
};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use http::request::Parts;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tower_sessions::Session;
use tracing::instrument;

/// The session key under which the logged-in user is stored.
pub const SESSION_USER_KEY: &str = "user";

/// An authenticated user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: i32,
    username: String,
}

impl User {
    /// The user's id.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// The user's name.
    pub fn username(&self) -> &str {
        self.username.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for User
where
    S: Send + Sync,
    DbPool: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A session established by the view layer wins over basic auth.
        if let Ok(session) = parts.extract::<Session>().await {
            if let Ok(Some(user)) = session.get::<User>(SESSION_USER_KEY).await {
                return Ok(user);
            }
        }

        let TypedHeader(auth) = parts
            .extract::<TypedHeader<Authorization<Basic>>>()
            .await
            .map_err(|_| ClientError::Unauthorized)?;

        let db = DbPool::from_ref(state);
        let mut conn = db.acquire().await.map_err(InternalError::SqlxError)?;
        let user = authenticate(&mut conn, auth.username(), auth.password()).await?;

        Ok(user)
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    password: String,
}

/// Validate a user's password.
#[instrument(skip(conn, password))]
pub async fn authenticate(
    conn: &mut PgConnection,
    username: &str,
    password: &str,
) -> ApiResult<User> {
    tracing::info!("Fetching {}'s password", username);
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, password FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(ClientError::Unauthorized)?;

    tracing::info!("Verifying password");
    let password_is_ok = bcrypt::verify(password, &user.password)?;
    if password_is_ok {
        Ok(User {
            id: user.id,
            username: user.username,
        })
    } else {
        Err(ClientError::Unauthorized.into())
    }
}

/// Creates a new user with a bcrypt-hashed password.
#[instrument(skip(conn, password))]
pub async fn create_user(
    conn: &mut PgConnection,
    username: &str,
    password: &str,
) -> ApiResult<User> {
    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (username, password)
        VALUES ($1, $2)
        RETURNING id, username, password
        "#,
    )
    .bind(username)
    .bind(hash)
    .fetch_one(&mut *conn)
    .await?;
    tracing::info!("Created user {}", user.username);
    Ok(User {
        id: user.id,
        username: user.username,
    })
}
