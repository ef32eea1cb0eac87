use crate::error::RequestError;
use crate::location::Location;
use crate::state::{write_state, SharedState};
use crate::types::{ApiRequest, ApiResponse, Credentials, HttpMethod, Outcome};
use serde_json::Value;
use std::time::Instant;
use url::Url;

/// A request ready to go on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    /// Parsed JSON body, `None` when the body field is empty
    pub body: Option<Value>,
}

/// Build the outgoing request for `https://{endpoint}{path}`
pub fn prepare(
    request: &ApiRequest,
    endpoint: &str,
    credentials: &Credentials,
) -> Result<PreparedRequest, RequestError> {
    let url = Url::parse(&format!("https://{endpoint}{}", request.path))?;

    let body = request
        .non_empty_body()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .map_err(RequestError::InvalidBody)?;

    let headers = vec![
        (
            "authorization",
            format!("Bearer {}", credentials.access_token),
        ),
        ("x-api-key", credentials.client_id.clone()),
        ("x-gw-ims-org-id", credentials.org_id.clone()),
    ];

    Ok(PreparedRequest {
        method: request.method,
        url,
        headers,
        body,
    })
}

/// Send a prepared request and capture whatever comes back
///
/// Non-2xx statuses are failures but still carry the error response.
pub async fn send(client: &reqwest::Client, prepared: PreparedRequest) -> Outcome {
    let mut request_builder = client.request(prepared.method.into(), prepared.url);

    for (name, value) in &prepared.headers {
        request_builder = request_builder.header(*name, value);
    }

    if let Some(body) = &prepared.body {
        request_builder = request_builder.json(body);
    }

    let start = Instant::now();

    let response = match request_builder.send().await {
        Ok(response) => response,
        Err(e) => {
            return Outcome::Failure {
                error: RequestError::Transport(e),
                response: None,
            };
        }
    };

    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();

    let headers: Vec<(String, String)> = response
        .headers()
        .iter()
        .map(|(key, value)| {
            (
                key.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            return Outcome::Failure {
                error: RequestError::Transport(e),
                response: None,
            };
        }
    };

    let api_response = ApiResponse {
        status: status.as_u16(),
        status_text: status_text.clone(),
        headers,
        data: ApiResponse::parse_body(&body),
        duration: start.elapsed(),
    };

    if api_response.is_success() {
        Outcome::Success(api_response)
    } else {
        Outcome::Failure {
            error: RequestError::Status {
                status: status.as_u16(),
                status_text,
            },
            response: Some(api_response),
        }
    }
}

/// Issue the current request in the background
///
/// Bumps the request generation before spawning, so whichever request was issued
/// last is the one whose result is shown. When a result lands, the request path is
/// remembered in `location`.
pub fn execute_request_background(
    state: SharedState,
    client: reqwest::Client,
    location: Option<Location>,
) {
    let (prepared, generation, path) = {
        let mut s = write_state(&state);
        let prepared = match prepare(
            &s.request.current,
            &s.session.endpoint,
            &s.session.credentials,
        ) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::warn!("Not sending request: {e}");
                s.request.reject(&e);
                return;
            }
        };
        let generation = s.request.begin();
        (prepared, generation, s.request.current.path.clone())
    };

    tracing::info!(
        generation,
        method = %prepared.method,
        url = %prepared.url,
        "Sending request"
    );

    tokio::spawn(async move {
        let outcome = send(&client, prepared).await;

        match &outcome {
            Outcome::Success(response) => tracing::info!(
                generation,
                status = response.status,
                duration_ms = response.duration.as_millis() as u64,
                "Request completed"
            ),
            Outcome::Failure { error, response } => tracing::error!(
                generation,
                status = response.as_ref().map(|r| r.status),
                "Unable to execute request: {error}"
            ),
        }

        let mut s = write_state(&state);
        if !s.apply_outcome(generation, outcome) {
            tracing::debug!(generation, "Discarding result of a superseded request");
            return;
        }

        // Still under the lock: once in_flight drops, the location is current
        if let Some(location) = location {
            if let Err(e) = location.write(&path) {
                tracing::warn!("Failed to remember location {path}: {e}");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, PROD_ENDPOINT};
    use crate::state::{read_state, AppState};
    use crate::types::FailureKind;
    use serde_json::json;
    use std::sync::{Arc, RwLock};
    use std::time::Duration;

    fn credentials() -> Credentials {
        Credentials {
            access_token: "access-token".to_string(),
            client_id: "cm-client".to_string(),
            org_id: "ORG@AdobeOrg".to_string(),
        }
    }

    #[test]
    fn test_prepare_get() {
        let prepared = prepare(
            &ApiRequest::get("/api/programs"),
            PROD_ENDPOINT,
            &credentials(),
        )
        .unwrap();

        assert_eq!(prepared.method, HttpMethod::Get);
        assert_eq!(
            prepared.url.as_str(),
            "https://cloudmanager.adobe.io/api/programs"
        );
        assert_eq!(
            prepared.headers,
            vec![
                ("authorization", "Bearer access-token".to_string()),
                ("x-api-key", "cm-client".to_string()),
                ("x-gw-ims-org-id", "ORG@AdobeOrg".to_string()),
            ]
        );
        assert_eq!(prepared.body, None);
    }

    #[test]
    fn test_prepare_keeps_query() {
        let prepared = prepare(
            &ApiRequest::get("/api/programs?start=20&limit=20"),
            "localhost:8443",
            &credentials(),
        )
        .unwrap();

        assert_eq!(prepared.url.host_str(), Some("localhost"));
        assert_eq!(prepared.url.port(), Some(8443));
        assert_eq!(prepared.url.query(), Some("start=20&limit=20"));
    }

    #[test]
    fn test_prepare_parses_body() {
        let request = ApiRequest {
            method: HttpMethod::Put,
            path: "/api/program/1/pipeline/2".to_string(),
            body: Some("{\"name\": \"main\", \"phases\": [1, 2]}".to_string()),
        };

        let prepared = prepare(&request, PROD_ENDPOINT, &credentials()).unwrap();

        assert_eq!(
            prepared.body,
            Some(json!({ "name": "main", "phases": [1, 2] }))
        );
    }

    #[test]
    fn test_prepare_empty_body_is_omitted() {
        let request = ApiRequest {
            method: HttpMethod::Post,
            path: "/api/x".to_string(),
            body: Some(String::new()),
        };
        assert_eq!(
            prepare(&request, PROD_ENDPOINT, &credentials()).unwrap().body,
            None
        );
    }

    #[test]
    fn test_prepare_rejects_malformed_body() {
        let request = ApiRequest {
            method: HttpMethod::Post,
            path: "/api/x".to_string(),
            body: Some("{\"name\": ".to_string()),
        };

        let err = prepare(&request, PROD_ENDPOINT, &credentials()).unwrap_err();
        assert!(matches!(err, RequestError::InvalidBody(_)));
    }

    #[test]
    fn test_prepare_rejects_bad_host() {
        let err = prepare(&ApiRequest::get("/api"), "bad host", &credentials()).unwrap_err();
        assert!(matches!(err, RequestError::InvalidUrl(_)));
    }

    #[test]
    fn test_malformed_body_never_reaches_network() {
        let mut app_state = AppState::new(
            Settings {
                endpoint: PROD_ENDPOINT.to_string(),
                credentials: credentials(),
            },
            "/api/x",
        );
        app_state.request.current.method = HttpMethod::Post;
        app_state.request.current.body = Some("not json".to_string());
        let state = Arc::new(RwLock::new(app_state));

        // No runtime here: this would panic if it tried to spawn a task
        execute_request_background(Arc::clone(&state), reqwest::Client::new(), None);

        let s = read_state(&state);
        assert!(!s.request.in_flight);
        assert_eq!(
            s.request.failure.as_ref().map(|f| f.kind.clone()),
            Some(FailureKind::InvalidBody)
        );
    }

    fn unreachable_state(path: &str) -> SharedState {
        Arc::new(RwLock::new(AppState::new(
            Settings {
                endpoint: "127.0.0.1:1".to_string(),
                credentials: credentials(),
            },
            path,
        )))
    }

    async fn wait_until_settled(state: &SharedState) {
        for _ in 0..500 {
            if !read_state(state).request.in_flight {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("request never completed");
    }

    #[tokio::test]
    async fn test_failed_request_is_applied_and_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let location = Location::in_dir(dir.path());
        let state = unreachable_state("/api/program/5");

        execute_request_background(
            Arc::clone(&state),
            reqwest::Client::new(),
            Some(location.clone()),
        );
        assert!(read_state(&state).request.in_flight);

        wait_until_settled(&state).await;

        let s = read_state(&state);
        assert_eq!(
            s.request.failure.as_ref().map(|f| f.kind.clone()),
            Some(FailureKind::RequestFailed)
        );
        assert!(s.request.response.is_none());
        assert_eq!(location.read().as_deref(), Some("/api/program/5"));
    }

    #[tokio::test]
    async fn test_only_latest_request_is_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let location = Location::in_dir(dir.path());
        let state = unreachable_state("/api/program/1");
        let client = reqwest::Client::new();

        execute_request_background(Arc::clone(&state), client.clone(), Some(location.clone()));
        write_state(&state).request.current = ApiRequest::get("/api/program/2");
        execute_request_background(Arc::clone(&state), client, Some(location.clone()));

        wait_until_settled(&state).await;
        // Give the superseded request time to finish and be discarded
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(read_state(&state).request.generation, 2);
        assert_eq!(location.read().as_deref(), Some("/api/program/2"));
    }

    #[tokio::test]
    async fn test_send_connection_refused_is_failure() {
        let prepared = PreparedRequest {
            method: HttpMethod::Get,
            url: Url::parse("https://127.0.0.1:1/api/programs").unwrap(),
            headers: vec![],
            body: None,
        };

        let outcome = send(&reqwest::Client::new(), prepared).await;

        match outcome {
            Outcome::Failure { error, response } => {
                assert!(matches!(error, RequestError::Transport(_)));
                assert!(response.is_none());
            }
            Outcome::Success(_) => panic!("expected a transport failure"),
        }
    }
}
