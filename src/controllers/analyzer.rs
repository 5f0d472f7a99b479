//! Task analyzer endpoints
//!
//! `analyze` proposes subtasks without persisting anything; `confirm` saves
//! an accepted proposal as a parent todo with children.

use serde::Deserialize;
use validator::Validate;

use crate::actions::ConfirmSubtasksAction;
use crate::analyzer::{ProposedSubtask, TaskAnalyzer};
use crate::auth;
use crate::config::LlmConfig;
use crate::db::DB;
use crate::http::{json, FormRequest, HttpResponse, Request, Response};

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeTaskPayload {
    /// Typed task description
    pub text: Option<String>,
    /// Text content of an uploaded file; wins over `text` when both are set
    pub file: Option<String>,
}

impl FormRequest for AnalyzeTaskPayload {}

#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmPayload {
    #[validate(length(min = 1, message = "At least one subtask is required"))]
    pub subtasks: Vec<ProposedSubtask>,
}

impl FormRequest for ConfirmPayload {}

pub async fn analyze(req: Request) -> Response {
    let db = DB::get()?;
    auth::require_user(&req, db.inner()).await?;
    let payload = AnalyzeTaskPayload::extract(req).await?;

    let analyzer = TaskAnalyzer::new(LlmConfig::from_env());
    let subtasks = analyzer
        .decompose(payload.text.as_deref(), payload.file.as_deref())
        .await?;

    HttpResponse::json(serde_json::json!({ "subtasks": subtasks })).ok()
}

pub async fn confirm(req: Request) -> Response {
    let db = DB::get()?;
    let user = auth::require_user(&req, db.inner()).await?;
    let payload = ConfirmPayload::extract(req).await?;

    let (parent, children) = ConfirmSubtasksAction::new(db)
        .execute(user.id, payload.subtasks)
        .await?;

    Ok(json(&serde_json::json!({
        "parent": parent,
        "children": children,
    }))?
    .status(201))
}
