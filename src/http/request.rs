use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::body::{collect_body, parse_form, parse_json};
use crate::error::Error;

/// HTTP request wrapper providing convenient access to request data
pub struct Request {
    inner: hyper::Request<hyper::body::Incoming>,
    params: HashMap<String, String>,
}

impl Request {
    pub fn new(inner: hyper::Request<hyper::body::Incoming>) -> Self {
        Self {
            inner,
            params: HashMap::new(),
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Get the request method
    pub fn method(&self) -> &hyper::Method {
        self.inner.method()
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    /// Get a route parameter by name (e.g. /todos/{id})
    pub fn param(&self, name: &str) -> Result<&str, Error> {
        self.params
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| Error::MissingParam(name.to_string()))
    }

    /// Get a query-string value by name
    pub fn query(&self, name: &str) -> Option<String> {
        let raw = self.inner.uri().query()?;
        serde_urlencoded::from_str::<Vec<(String, String)>>(raw)
            .ok()?
            .into_iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get a cookie value by name from the Cookie header
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.header("cookie")?.split(';').find_map(|pair| {
            let (k, v) = pair.trim().split_once('=')?;
            (k == name).then_some(v)
        })
    }

    /// Consume the request and collect the body as bytes
    pub async fn body_bytes(self) -> Result<(RequestParts, Bytes), Error> {
        let content_type = self
            .inner
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let params = self.params;
        let bytes = collect_body(self.inner.into_body()).await?;

        Ok((
            RequestParts {
                params,
                content_type,
            },
            bytes,
        ))
    }

    /// Parse the request body as JSON
    ///
    /// Consumes the request since the body can only be read once.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, Error> {
        let (_, bytes) = self.body_bytes().await?;
        parse_json(&bytes)
    }

    /// Parse the request body based on the Content-Type header
    ///
    /// Form-urlencoded bodies parse as forms; everything else parses as JSON.
    pub async fn input<T: DeserializeOwned>(self) -> Result<T, Error> {
        let (parts, bytes) = self.body_bytes().await?;

        match parts.content_type.as_deref() {
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => parse_form(&bytes),
            _ => parse_json(&bytes),
        }
    }
}

/// Request parts after the body has been separated
#[derive(Clone)]
pub struct RequestParts {
    pub params: HashMap<String, String>,
    pub content_type: Option<String>,
}
