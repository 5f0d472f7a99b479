//! Controllers
//!
//! Handlers parse the request, run an action, and serialize the result.
//! Business rules live in `actions`; auth checks happen here before the
//! request body is consumed.

pub mod admin;
pub mod analyzer;
pub mod auth;
pub mod calendar;
pub mod home;
pub mod todos;

use uuid::Uuid;

use crate::error::Error;
use crate::http::Request;

/// Parse a `{id}` route parameter as a UUID
fn uuid_param(req: &Request, name: &str) -> Result<Uuid, Error> {
    req.param(name)?
        .parse::<Uuid>()
        .map_err(|_| Error::invalid_param(name, "uuid"))
}
