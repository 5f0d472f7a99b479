//! Calendar endpoint
//!
//! Returns the user's dated todos bucketed by due date. The optional `date`
//! query names the day the client is focused on and is echoed back after
//! validation; undated todos never appear here.

use chrono::{NaiveDate, Utc};

use crate::actions::ListCalendarTodosAction;
use crate::auth;
use crate::db::DB;
use crate::error::Error;
use crate::http::{HttpResponse, Request, Response};

pub async fn index(req: Request) -> Response {
    let db = DB::get()?;
    let user = auth::require_user(&req, db.inner()).await?;

    let date = match req.query("date") {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| Error::invalid_param("date", "YYYY-MM-DD"))?,
        None => Utc::now().date_naive(),
    };

    let days = ListCalendarTodosAction::new(db).execute(user.id).await?;

    HttpResponse::json(serde_json::json!({
        "date": date,
        "days": days,
    }))
    .ok()
}
