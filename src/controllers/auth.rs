//! Sign-up, sign-in, sign-out, and the current-user endpoint
//!
//! Successful sign-up/sign-in set the session cookie; sign-out clears it.

use serde::Deserialize;
use validator::Validate;

use crate::auth::{self, SESSION_COOKIE};
use crate::db::DB;
use crate::http::{FormRequest, HttpResponse, Request, Response};

const COOKIE_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Validate)]
pub struct SignUpPayload {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl FormRequest for SignUpPayload {}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInPayload {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl FormRequest for SignInPayload {}

fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, COOKIE_MAX_AGE_SECS
    )
}

fn clear_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE)
}

pub async fn sign_up(req: Request) -> Response {
    let db = DB::get()?;
    let payload = SignUpPayload::extract(req).await?;

    let (user, session) =
        auth::sign_up(db.inner(), &payload.name, &payload.email, &payload.password).await?;

    HttpResponse::json(serde_json::json!({ "user": user }))
        .status(201)
        .header("Set-Cookie", session_cookie(&session.token))
        .ok()
}

pub async fn sign_in(req: Request) -> Response {
    let db = DB::get()?;
    let payload = SignInPayload::extract(req).await?;

    let (user, session) = auth::sign_in(db.inner(), &payload.email, &payload.password).await?;

    HttpResponse::json(serde_json::json!({ "user": user }))
        .header("Set-Cookie", session_cookie(&session.token))
        .ok()
}

pub async fn sign_out(req: Request) -> Response {
    let db = DB::get()?;
    auth::sign_out(&req, db.inner()).await?;

    HttpResponse::json(serde_json::json!({ "signed_out": true }))
        .header("Set-Cookie", clear_cookie())
        .ok()
}

pub async fn me(req: Request) -> Response {
    let db = DB::get()?;
    let user = auth::require_user(&req, db.inner()).await?;
    HttpResponse::json(serde_json::json!({ "user": user })).ok()
}
