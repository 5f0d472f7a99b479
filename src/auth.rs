//! Session authentication
//!
//! Sessions are opaque random tokens stored in the `sessions` table and
//! presented either as a `session-token` cookie or an `Authorization:
//! Bearer` header. Passwords are bcrypt-hashed. Expired sessions are
//! deleted lazily on lookup.

use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::error::Error;
use crate::http::Request;
use crate::models::{sessions, users};

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "session-token";

/// Session lifetime
const SESSION_TTL_DAYS: i64 = 30;

/// Token length in characters
const TOKEN_LEN: usize = 48;

/// The authenticated user attached to a request
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == users::ROLE_ADMIN
    }
}

impl From<users::Model> for AuthUser {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Extract the session token from the request, cookie first
pub fn session_token(req: &Request) -> Option<String> {
    if let Some(token) = req.cookie(SESSION_COOKIE) {
        return Some(token.to_string());
    }
    req.header("authorization")?
        .strip_prefix("Bearer ")
        .map(|t| t.to_string())
}

/// Resolve the request's session to a user, if any
pub async fn session_user(
    req: &Request,
    db: &DatabaseConnection,
) -> Result<Option<AuthUser>, Error> {
    let Some(token) = session_token(req) else {
        return Ok(None);
    };

    let Some(session) = sessions::Entity::find_by_id(&token).one(db).await? else {
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        session.delete(db).await?;
        return Ok(None);
    }

    let user = session.find_related(users::Entity).one(db).await?;
    Ok(user.map(AuthUser::from))
}

/// Require a valid session, or fail with `Unauthenticated`
pub async fn require_user(req: &Request, db: &DatabaseConnection) -> Result<AuthUser, Error> {
    session_user(req, db).await?.ok_or(Error::Unauthenticated)
}

/// Require a valid session with the admin role
pub async fn require_admin(req: &Request, db: &DatabaseConnection) -> Result<AuthUser, Error> {
    let user = require_user(req, db).await?;
    if !user.is_admin() {
        return Err(Error::Unauthorized);
    }
    Ok(user)
}

/// Register a new user and open a session
pub async fn sign_up(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(users::Model, sessions::Model), Error> {
    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::validation("email", "Email is already registered"));
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| Error::internal(format!("Failed to hash password: {}", e)))?;

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        role: Set(users::ROLE_USER.to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    let session = create_session(db, user.id).await?;
    Ok((user, session))
}

/// Authenticate by email/password and open a session
pub async fn sign_in(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<(users::Model, sessions::Model), Error> {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or(Error::Unauthenticated)?;

    let valid = bcrypt::verify(password, &user.password_hash)
        .map_err(|e| Error::internal(format!("Failed to verify password: {}", e)))?;
    if !valid {
        return Err(Error::Unauthenticated);
    }

    let session = create_session(db, user.id).await?;
    Ok((user, session))
}

/// Invalidate the request's session, if present
pub async fn sign_out(req: &Request, db: &DatabaseConnection) -> Result<(), Error> {
    if let Some(token) = session_token(req) {
        sessions::Entity::delete_by_id(&token).exec(db).await?;
    }
    Ok(())
}

async fn create_session(db: &DatabaseConnection, user_id: Uuid) -> Result<sessions::Model, Error> {
    let now = Utc::now();
    let session = sessions::ActiveModel {
        token: Set(generate_token()),
        user_id: Set(user_id),
        created_at: Set(now),
        expires_at: Set(now + Duration::days(SESSION_TTL_DAYS)),
    }
    .insert(db)
    .await?;
    Ok(session)
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_unique_and_sized() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LEN);
        assert_ne!(a, b);
    }
}
