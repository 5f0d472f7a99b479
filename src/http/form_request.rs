//! FormRequest trait for validated request payloads
//!
//! Payload structs derive `Deserialize` + `Validate` and opt in with a
//! one-line `impl FormRequest for ...`. `extract()` parses the body (JSON or
//! form-urlencoded by Content-Type) and runs validation, turning failures
//! into a 422 with a per-field error map.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::body::{parse_form, parse_json};
use super::Request;
use crate::error::{Error, ValidationErrors};

#[async_trait]
pub trait FormRequest: Sized + DeserializeOwned + Validate + Send {
    /// Extract and validate payload data from the request
    async fn extract(req: Request) -> Result<Self, Error> {
        let content_type = req.content_type().map(|s| s.to_string());
        let (_, bytes) = req.body_bytes().await?;

        let data: Self = match content_type.as_deref() {
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => parse_form(&bytes)?,
            _ => parse_json(&bytes)?,
        };

        if let Err(errors) = data.validate() {
            return Err(Error::Validation(ValidationErrors::from_validator(errors)));
        }

        Ok(data)
    }
}
