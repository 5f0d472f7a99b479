use crate::http::{HttpResponse, Request, Response};

pub async fn index(_req: Request) -> Response {
    HttpResponse::json(serde_json::json!({
        "app": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
    .ok()
}
