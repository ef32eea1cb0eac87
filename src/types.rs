use crate::error::RequestError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_PATH: &str = "/api/programs";

/// HTTP methods the playground can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Methods that carry a JSON body and a content-type header
    pub fn sends_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    /// Next method in GET -> POST -> PUT -> PATCH -> DELETE -> GET order
    pub fn next(self) -> Self {
        match self {
            HttpMethod::Get => HttpMethod::Post,
            HttpMethod::Post => HttpMethod::Put,
            HttpMethod::Put => HttpMethod::Patch,
            HttpMethod::Patch => HttpMethod::Delete,
            HttpMethod::Delete => HttpMethod::Get,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// The request the user is about to send (or last sent)
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<String>,
}

impl ApiRequest {
    /// A bodiless GET for the given path
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    /// Body text, if it has any content
    pub fn non_empty_body(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.trim().is_empty())
    }
}

impl Default for ApiRequest {
    fn default() -> Self {
        Self::get(DEFAULT_PATH)
    }
}

/// An HTTP response as received, success or not
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code (200, 404, etc.)
    pub status: u16,

    /// Human-readable status text ("OK", "Not Found", etc.)
    pub status_text: String,

    /// Response headers in the order they were received
    pub headers: Vec<(String, String)>,

    /// Parsed JSON body; a JSON string if the body was not JSON, `Null` if empty
    pub data: Value,

    /// Time taken to complete the request
    pub duration: Duration,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Interpret a raw body the way the views expect it
    pub fn parse_body(body: &str) -> Value {
        if body.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    /// The body field did not parse; nothing was sent
    InvalidBody,
    /// Network error or non-2xx status
    RequestFailed,
}

/// What the error banner shows
#[derive(Debug, Clone, PartialEq)]
pub struct RequestFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&RequestError> for RequestFailure {
    fn from(err: &RequestError) -> Self {
        let kind = match err {
            RequestError::InvalidBody(_) => FailureKind::InvalidBody,
            _ => FailureKind::RequestFailed,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Result of one executed request
#[derive(Debug)]
pub enum Outcome {
    Success(ApiResponse),
    Failure {
        error: RequestError,
        /// The error response, when the server sent one
        response: Option<ApiResponse>,
    },
}

/// Which API deployment the default endpoint points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Prod,
    Stage,
}

/// Credentials supplied from outside; the token never leaves memory
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    pub access_token: String,
    pub client_id: String,
    pub org_id: String,
}

impl Credentials {
    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Short display form of the token for the header bar
    pub fn masked_token(&self) -> String {
        let token = &self.access_token;
        let chars: Vec<char> = token.chars().collect();
        if chars.len() <= 15 {
            return "●".repeat(chars.len());
        }

        let first: String = chars[..7].iter().collect();
        let last: String = chars[chars.len() - 6..].iter().collect();
        format!("{first}...{last}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.masked_token())
            .field("client_id", &self.client_id)
            .field("org_id", &self.org_id)
            .finish()
    }
}

/// The three response views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseTab {
    #[default]
    Structured,
    Raw,
    Request,
}

impl ResponseTab {
    pub const ALL: [ResponseTab; 3] = [
        ResponseTab::Structured,
        ResponseTab::Raw,
        ResponseTab::Request,
    ];

    pub fn index(&self) -> usize {
        match self {
            ResponseTab::Structured => 0,
            ResponseTab::Raw => 1,
            ResponseTab::Request => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResponseTab::Structured => "Structured Response",
            ResponseTab::Raw => "Raw Response",
            ResponseTab::Request => "Request",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which field, if any, is receiving keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    EditingPath,
    EditingBody,
    EditingEndpoint,
    EditingOrgId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_cycle_returns_to_get() {
        let mut method = HttpMethod::Get;
        for _ in 0..5 {
            method = method.next();
        }
        assert_eq!(method, HttpMethod::Get);
    }

    #[test]
    fn test_sends_body() {
        assert!(HttpMethod::Post.sends_body());
        assert!(HttpMethod::Put.sends_body());
        assert!(HttpMethod::Patch.sends_body());
        assert!(!HttpMethod::Get.sends_body());
        assert!(!HttpMethod::Delete.sends_body());
    }

    #[test]
    fn test_non_empty_body() {
        let mut request = ApiRequest::get("/api/programs");
        assert_eq!(request.non_empty_body(), None);

        request.body = Some("   ".to_string());
        assert_eq!(request.non_empty_body(), None);

        request.body = Some("{}".to_string());
        assert_eq!(request.non_empty_body(), Some("{}"));
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(ApiResponse::parse_body(""), Value::Null);
        assert_eq!(
            ApiResponse::parse_body("{\"a\":1}"),
            serde_json::json!({ "a": 1 })
        );
        assert_eq!(
            ApiResponse::parse_body("<html>"),
            Value::String("<html>".to_string())
        );
    }

    #[test]
    fn test_tab_index_round_trip() {
        for tab in ResponseTab::ALL {
            assert_eq!(ResponseTab::from_index(tab.index()), Some(tab));
        }
        assert_eq!(ResponseTab::from_index(3), None);
    }

    #[test]
    fn test_tab_next_previous_wrap() {
        assert_eq!(ResponseTab::Request.next(), ResponseTab::Structured);
        assert_eq!(ResponseTab::Structured.previous(), ResponseTab::Request);
        assert_eq!(ResponseTab::Raw.next(), ResponseTab::Request);
    }

    #[test]
    fn test_masked_token_short() {
        let creds = Credentials {
            access_token: "short".to_string(),
            ..Default::default()
        };
        assert_eq!(creds.masked_token(), "●●●●●");
    }

    #[test]
    fn test_masked_token_long() {
        let creds = Credentials {
            access_token: "eyJhbGciOiJSUzI1NiJ9.payload.signature".to_string(),
            ..Default::default()
        };
        assert_eq!(creds.masked_token(), "eyJhbGc...nature");
    }

    #[test]
    fn test_debug_never_prints_token() {
        let creds = Credentials {
            access_token: "supersecrettokenvalue123".to_string(),
            client_id: "client".to_string(),
            org_id: "org@AdobeOrg".to_string(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("supersecrettokenvalue123"));
        assert!(debug.contains("org@AdobeOrg"));
    }
}
