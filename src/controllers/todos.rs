//! Todo CRUD endpoints
//!
//! All endpoints require a session. Mutations go through actions that scope
//! every query by the authenticated user.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::uuid_param;
use crate::actions::{
    CreateTodoAction, DeleteTodoAction, ListTodosAction, ToggleTodoAction, TodoChanges,
    UpdateTodoAction,
};
use crate::auth;
use crate::db::DB;
use crate::http::{json, FormRequest, HttpResponse, Request, Response};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoPayload {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub parent_id: Option<Uuid>,
}

impl FormRequest for CreateTodoPayload {}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTodoPayload {
    #[validate(length(min = 1, max = 255, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed: Option<bool>,
}

impl FormRequest for UpdateTodoPayload {}

pub async fn index(req: Request) -> Response {
    let db = DB::get()?;
    let user = auth::require_user(&req, db.inner()).await?;

    let groups = ListTodosAction::new(db).execute(user.id).await?;
    json(&groups)
}

pub async fn store(req: Request) -> Response {
    let db = DB::get()?;
    let user = auth::require_user(&req, db.inner()).await?;
    let payload = CreateTodoPayload::extract(req).await?;

    let todo = CreateTodoAction::new(db)
        .execute(user.id, payload.title, payload.due_date, payload.parent_id)
        .await?;

    Ok(json(&todo)?.status(201))
}

pub async fn toggle(req: Request) -> Response {
    let db = DB::get()?;
    let user = auth::require_user(&req, db.inner()).await?;
    let id = uuid_param(&req, "id")?;

    let todo = ToggleTodoAction::new(db).execute(user.id, id).await?;
    json(&todo)
}

pub async fn update(req: Request) -> Response {
    let db = DB::get()?;
    let user = auth::require_user(&req, db.inner()).await?;
    let id = uuid_param(&req, "id")?;
    let payload = UpdateTodoPayload::extract(req).await?;

    let todo = UpdateTodoAction::new(db)
        .execute(
            user.id,
            id,
            TodoChanges {
                title: payload.title,
                due_date: payload.due_date,
                completed: payload.completed,
            },
        )
        .await?;
    json(&todo)
}

pub async fn destroy(req: Request) -> Response {
    let db = DB::get()?;
    let user = auth::require_user(&req, db.inner()).await?;
    let id = uuid_param(&req, "id")?;

    DeleteTodoAction::new(db).execute(user.id, id).await?;
    HttpResponse::json(serde_json::json!({ "deleted": true })).ok()
}
