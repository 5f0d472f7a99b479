//! Admin overview endpoints
//!
//! Route-level middleware only checks that a token is present; the role
//! check happens here against the database.

use super::uuid_param;
use crate::actions::{AdminDeleteTodoAction, ListAllTodosAction};
use crate::auth;
use crate::db::DB;
use crate::http::{json, HttpResponse, Request, Response};

pub async fn index(req: Request) -> Response {
    let db = DB::get()?;
    auth::require_admin(&req, db.inner()).await?;

    let rows = ListAllTodosAction::new(db).execute().await?;
    json(&rows)
}

pub async fn destroy(req: Request) -> Response {
    let db = DB::get()?;
    auth::require_admin(&req, db.inner()).await?;
    let id = uuid_param(&req, "id")?;

    AdminDeleteTodoAction::new(db).execute(id).await?;
    HttpResponse::json(serde_json::json!({ "deleted": true })).ok()
}
