use bytes::Bytes;
use http_body_util::Full;

use crate::error::Error;

/// HTTP response builder
pub struct HttpResponse {
    status: u16,
    body: String,
    headers: Vec<(String, String)>,
}

/// Response type alias - both sides carry a response so handlers can use `?`
pub type Response = Result<HttpResponse, HttpResponse>;

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: String::new(),
            headers: Vec::new(),
        }
    }

    /// Create a response with a plain-text body
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
        }
    }

    /// Create a JSON response from a serde_json::Value
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    /// Set the HTTP status code
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Add a header to the response
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Wrap this response in Ok() for use as the Response type
    pub fn ok(self) -> Response {
        Ok(self)
    }

    /// Convert to a hyper response
    pub fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let mut builder = hyper::Response::builder().status(self.status);

        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        builder
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|_| {
                hyper::Response::builder()
                    .status(500)
                    .body(Full::new(Bytes::from_static(b"{\"error\":\"response build failed\"}")))
                    .expect("static fallback response")
            })
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert application errors to HTTP responses
///
/// This enables the `?` operator in controller handlers: any `Error` becomes
/// the appropriate status code with a JSON body.
impl From<Error> for HttpResponse {
    fn from(err: Error) -> HttpResponse {
        let status = err.status_code();
        let body = match &err {
            Error::Validation(errors) => errors.to_json(),
            _ => serde_json::json!({ "error": err.to_string() }),
        };
        HttpResponse::json(body).status(status)
    }
}
