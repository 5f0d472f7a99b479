//! Route table
//!
//! Admin routes sit behind `AuthMiddleware`, which rejects requests with no
//! session token before the body is touched. Every other protected endpoint
//! checks the session itself in the controller.

use crate::controllers;
use crate::middleware::AuthMiddleware;
use crate::routing::Router;

pub fn build_router() -> Router {
    Router::new()
        .get("/", controllers::home::index)
        .post("/auth/sign-up", controllers::auth::sign_up)
        .post("/auth/sign-in", controllers::auth::sign_in)
        .post("/auth/sign-out", controllers::auth::sign_out)
        .get("/auth/me", controllers::auth::me)
        .get("/todos", controllers::todos::index)
        .post("/todos", controllers::todos::store)
        .post("/todos/{id}/toggle", controllers::todos::toggle)
        .put("/todos/{id}", controllers::todos::update)
        .delete("/todos/{id}", controllers::todos::destroy)
        .get("/calendar", controllers::calendar::index)
        .post("/api/analyze-task", controllers::analyzer::analyze)
        .post("/api/analyze-task/confirm", controllers::analyzer::confirm)
        .get("/admin/todos", controllers::admin::index)
        .middleware(AuthMiddleware)
        .delete("/admin/todos/{id}", controllers::admin::destroy)
        .middleware(AuthMiddleware)
        .into()
}
