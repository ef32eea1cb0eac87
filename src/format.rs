//! Text for the raw and request views
//!
//! Everything here is a pure derivation from current state.

use crate::types::{ApiRequest, ApiResponse};
use serde_json::Value;

/// Pretty JSON with two-space indentation
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Response body for the raw view, empty when there is no response
pub fn raw_body(response: Option<&ApiResponse>) -> String {
    response.map(|r| pretty_json(&r.data)).unwrap_or_default()
}

/// `name: value` lines in the order the headers arrived
pub fn raw_headers(response: Option<&ApiResponse>) -> String {
    response
        .map(|r| {
            r.headers
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Request dump suitable for copy-paste
///
/// Credentials are replaced by placeholders; only the org id is shown as-is.
pub fn request_text(request: &ApiRequest, endpoint: &str, org_id: &str) -> String {
    let mut lines = vec![
        format!("{} {}", request.method, request.path),
        format!("host: {endpoint}"),
        "x-api-key: YOUR_KEY".to_string(),
        format!("x-gw-ims-org-id: {org_id}"),
        "authorization: Bearer YOUR_TOKEN".to_string(),
    ];

    if request.method.sends_body() {
        lines.push("content-type: application/json".to_string());
    }

    if let Some(body) = request.body.as_deref().filter(|b| !b.is_empty()) {
        lines.push(body.to_string());
    }

    lines.join("\n")
}

/// Equivalent curl invocation, with the same placeholders as [`request_text`]
pub fn curl_command(request: &ApiRequest, endpoint: &str, org_id: &str) -> String {
    let url = format!("https://{endpoint}{}", request.path);
    let mut parts = vec![
        format!("curl -X {} {}", request.method, shell_quote(&url)),
        "-H 'authorization: Bearer YOUR_TOKEN'".to_string(),
        "-H 'x-api-key: YOUR_KEY'".to_string(),
        format!("-H {}", shell_quote(&format!("x-gw-ims-org-id: {org_id}"))),
    ];

    if request.method.sends_body() {
        parts.push("-H 'content-type: application/json'".to_string());
    }

    if let Some(body) = request.body.as_deref().filter(|b| !b.is_empty()) {
        parts.push(format!("--data {}", shell_quote(body)));
    }

    parts.join(" \\\n  ")
}

/// Single-quote for a POSIX shell; embedded quotes become `'\''`
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpMethod;
    use serde_json::json;
    use std::time::Duration;

    fn response(data: Value, headers: &[(&str, &str)]) -> ApiResponse {
        ApiResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            data,
            duration: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_raw_views_empty_without_response() {
        assert_eq!(raw_body(None), "");
        assert_eq!(raw_headers(None), "");
    }

    #[test]
    fn test_raw_body_is_full_json() {
        let r = response(json!({ "_links": { "self": { "href": "/api/programs" } } }), &[]);
        assert_eq!(
            raw_body(Some(&r)),
            "{\n  \"_links\": {\n    \"self\": {\n      \"href\": \"/api/programs\"\n    }\n  }\n}"
        );
    }

    #[test]
    fn test_raw_headers_keep_order() {
        let r = response(
            Value::Null,
            &[("x-request-id", "abc"), ("content-type", "application/hal+json")],
        );
        assert_eq!(
            raw_headers(Some(&r)),
            "x-request-id: abc\ncontent-type: application/hal+json"
        );
    }

    #[test]
    fn test_request_text_get_without_body() {
        let request = ApiRequest::get("/api/programs");
        let text = request_text(&request, "cloudmanager.adobe.io", "ORG@AdobeOrg");

        assert_eq!(
            text,
            "GET /api/programs\n\
             host: cloudmanager.adobe.io\n\
             x-api-key: YOUR_KEY\n\
             x-gw-ims-org-id: ORG@AdobeOrg\n\
             authorization: Bearer YOUR_TOKEN"
        );
    }

    #[test]
    fn test_request_text_post_with_body() {
        let request = ApiRequest {
            method: HttpMethod::Post,
            path: "/api/program/1/pipeline/2/execution".to_string(),
            body: Some("{\"a\":1}".to_string()),
        };
        let text = request_text(&request, "cloudmanager.adobe.io", "ORG");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "POST /api/program/1/pipeline/2/execution");
        assert_eq!(lines[5], "content-type: application/json");
        assert_eq!(lines[6], "{\"a\":1}");
    }

    #[test]
    fn test_request_text_delete_has_no_content_type() {
        let request = ApiRequest {
            method: HttpMethod::Delete,
            path: "/api/program/1".to_string(),
            body: None,
        };
        let text = request_text(&request, "host", "ORG");
        assert!(!text.contains("content-type"));
    }

    #[test]
    fn test_curl_command_escapes_quotes() {
        let request = ApiRequest {
            method: HttpMethod::Put,
            path: "/api/x".to_string(),
            body: Some("{\"name\":\"it's\"}".to_string()),
        };
        let curl = curl_command(&request, "host", "ORG");

        assert!(curl.starts_with("curl -X PUT 'https://host/api/x'"));
        assert!(curl.contains("-H 'content-type: application/json'"));
        assert!(curl.contains(r#"--data '{"name":"it'\''s"}'"#));
        assert!(!curl.contains("secret"));
    }

    #[test]
    fn test_curl_quotes_path_and_org() {
        let request = ApiRequest::get("/api/program/it's");
        let curl = curl_command(&request, "host", "O'Org");

        assert!(curl.starts_with(r"curl -X GET 'https://host/api/program/it'\''s'"));
        assert!(curl.contains(r"-H 'x-gw-ims-org-id: O'\''Org'"));
    }
}
