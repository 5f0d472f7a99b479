//! HTTP request/response types
//!
//! Thin wrappers over hyper giving controllers ergonomic access to params,
//! cookies, and bodies, plus a `Response` alias that lets handlers bail out
//! with `?`.

mod body;
mod form_request;
mod request;
mod response;

pub use body::{collect_body, parse_form, parse_json};
pub use form_request::FormRequest;
pub use request::{Request, RequestParts};
pub use response::{HttpResponse, Response};

use serde::Serialize;

use crate::error::Error;

/// Create a text response
pub fn text(body: impl Into<String>) -> Response {
    Ok(HttpResponse::text(body))
}

/// Create a JSON response from any serializable value
pub fn json<T: Serialize>(value: &T) -> Response {
    match serde_json::to_value(value) {
        Ok(v) => Ok(HttpResponse::json(v)),
        Err(e) => Err(Error::internal(format!("Failed to serialize response: {}", e)).into()),
    }
}
