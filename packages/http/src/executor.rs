//! HTTP execution abstraction.
//!
//! [`HttpExecutor`] is the seam between the volume workflow and the network.
//! [`ReqwestExecutor`] talks to a real array; [`mock::MockExecutor`] records
//! requests and replays canned responses so tests never open a socket.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::context::RequestContext;
use crate::error::Error;
use crate::types::{HttpRequest, HttpResponse};

/// Trait for executing HTTP requests.
pub trait HttpExecutor: Send + Sync {
    /// Execute `request` under `ctx`.
    ///
    /// Implementations must not send anything when `ctx` is already
    /// cancelled or past its deadline.
    ///
    /// The context is checked before the request goes out. A cancellation
    /// raised while a request is in flight does not interrupt it: the call
    /// returns when the reply arrives or the request timeout fires, and the
    /// timeout is never longer than the time left before the deadline.
    fn execute(&self, ctx: &RequestContext, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

impl<E: HttpExecutor + ?Sized> HttpExecutor for std::sync::Arc<E> {
    fn execute(&self, ctx: &RequestContext, request: &HttpRequest) -> Result<HttpResponse, Error> {
        (**self).execute(ctx, request)
    }
}

/// Production HTTP executor using blocking reqwest.
pub struct ReqwestExecutor {
    client: Client,
    base_url: Url,
    timeout: Duration,
    credentials: Option<(String, String)>,
}

impl ReqwestExecutor {
    /// Create an executor for the array at `endpoint`, e.g.
    /// `https://cluster.example.com:8080`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, Error> {
        Self::build(endpoint, timeout, false)
    }

    /// Like [`ReqwestExecutor::new`] but skips TLS certificate verification.
    pub fn insecure(endpoint: &str, timeout: Duration) -> Result<Self, Error> {
        Self::build(endpoint, timeout, true)
    }

    /// Create with default timeout of 30 seconds.
    pub fn with_default_timeout(endpoint: &str) -> Result<Self, Error> {
        Self::new(endpoint, Duration::from_secs(30))
    }

    /// Send HTTP basic credentials with every request.
    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build(endpoint: &str, timeout: Duration, insecure: bool) -> Result<Self, Error> {
        let mut base_url = Url::parse(endpoint)?;
        // Url::join drops the last segment of a base without a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .build()?;

        Ok(Self {
            client,
            base_url,
            timeout,
            credentials: None,
        })
    }
}

impl HttpExecutor for ReqwestExecutor {
    fn execute(&self, ctx: &RequestContext, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let remaining = ctx.check()?;
        let timeout = remaining.map_or(self.timeout, |r| r.min(self.timeout));

        let url = self.base_url.join(request.path.trim_start_matches('/'))?;
        let method: http::Method = request.method.into();

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let header_name = HeaderName::try_from(name.as_str())?;
            let header_value = HeaderValue::try_from(value.as_str())?;
            headers.insert(header_name, header_value);
        }

        tracing::debug!(method = %request.method, url = %url, "sending request");

        let mut req_builder = self.client.request(method, url).headers(headers).timeout(timeout);

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some((user, password)) = &self.credentials {
            req_builder = req_builder.basic_auth(user, Some(password));
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder.send()?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut resp_headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                resp_headers.insert(name.to_string(), v.to_string());
            }
        }

        let body_text = response.text()?;
        let body = serde_json::from_str(&body_text).unwrap_or(serde_json::Value::Null);

        tracing::debug!(method = %request.method, path = %request.path, status, "received response");

        Ok(HttpResponse {
            status,
            status_text,
            headers: resp_headers,
            body,
            body_text: Some(body_text),
        })
    }
}

/// Mock HTTP executor for testing.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// A mock HTTP executor that returns predefined responses.
    ///
    /// Resolution order for each request: the scripted queue (one entry
    /// per call), then `fail_with`, then a response registered for the
    /// request path, then the default response, then 404.
    #[derive(Clone, Default)]
    pub struct MockExecutor {
        scripted: Arc<Mutex<VecDeque<Result<HttpResponse, String>>>>,
        responses: Arc<Mutex<HashMap<String, HttpResponse>>>,
        default_response: Arc<Mutex<Option<HttpResponse>>>,
        recorded_requests: Arc<Mutex<Vec<HttpRequest>>>,
        error_message: Arc<Mutex<Option<String>>>,
    }

    impl MockExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a response for the next unanswered call.
        pub fn then_respond(self, response: HttpResponse) -> Self {
            self.scripted.lock().unwrap().push_back(Ok(response));
            self
        }

        /// Queue a transport failure for the next unanswered call.
        pub fn then_fail(self, message: impl Into<String>) -> Self {
            self.scripted.lock().unwrap().push_back(Err(message.into()));
            self
        }

        /// Add a response for a specific path.
        pub fn with_response(self, path: impl Into<String>, response: HttpResponse) -> Self {
            self.responses.lock().unwrap().insert(path.into(), response);
            self
        }

        pub fn with_default_response(self, response: HttpResponse) -> Self {
            *self.default_response.lock().unwrap() = Some(response);
            self
        }

        /// Fail every request that has no scripted answer.
        pub fn fail_with(self, message: impl Into<String>) -> Self {
            *self.error_message.lock().unwrap() = Some(message.into());
            self
        }

        pub fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.recorded_requests.lock().unwrap().clone()
        }

        pub fn clear_recorded(&self) {
            self.recorded_requests.lock().unwrap().clear();
        }

        pub fn success_response(body: serde_json::Value) -> HttpResponse {
            let body_text = body.to_string();
            HttpResponse {
                status: 200,
                status_text: "OK".to_string(),
                headers: HashMap::new(),
                body,
                body_text: Some(body_text),
            }
        }

        /// An error response in the array's `{"errors": [..]}` shape.
        pub fn error_response(status: u16, message: &str) -> HttpResponse {
            let body = serde_json::json!({
                "errors": [{"code": "AEC_EXCEPTION", "message": message}]
            });
            HttpResponse {
                status,
                status_text: message.to_string(),
                headers: HashMap::new(),
                body_text: Some(body.to_string()),
                body,
            }
        }

        pub fn not_found() -> HttpResponse {
            let body = serde_json::json!({
                "errors": [{"code": "AEC_NOT_FOUND", "message": "Not Found"}]
            });
            HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                headers: HashMap::new(),
                body_text: Some(body.to_string()),
                body,
            }
        }
    }

    impl HttpExecutor for MockExecutor {
        fn execute(
            &self,
            ctx: &RequestContext,
            request: &HttpRequest,
        ) -> Result<HttpResponse, Error> {
            ctx.check()?;

            self.recorded_requests.lock().unwrap().push(request.clone());

            if let Some(scripted) = self.scripted.lock().unwrap().pop_front() {
                return scripted.map_err(|message| Error::Unavailable { message });
            }

            if let Some(message) = self.error_message.lock().unwrap().clone() {
                return Err(Error::Unavailable { message });
            }

            if let Some(response) = self.responses.lock().unwrap().get(&request.path) {
                return Ok(response.clone());
            }

            if let Some(ref response) = *self.default_response.lock().unwrap() {
                return Ok(response.clone());
            }

            Ok(Self::not_found())
        }
    }
}
