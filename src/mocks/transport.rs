//! Mock HTTP transport for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{SesError, SesResult};
use crate::http::{HttpRequest, HttpResponse, HttpTransport};

/// Mock HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Create a successful response with body.
    pub fn ok_with_body(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Create an error response.
    pub fn error(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header to the response.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// Mock HTTP transport for testing.
///
/// Responses are returned in the order they were queued; once the queue is
/// empty the default response, if any, is returned. Every request is
/// recorded.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<Vec<MockResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    default_response: Option<MockResponse>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Create a new mock transport with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transport with queued responses.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            ..Self::default()
        }
    }

    /// Create a mock transport with a default response.
    pub fn with_default(response: MockResponse) -> Self {
        Self {
            default_response: Some(response),
            ..Self::default()
        }
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: MockResponse) {
        locked(&self.responses).push(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        locked(&self.requests).clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        locked(&self.requests).len()
    }

    /// Get the last request made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        locked(&self.requests).last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> SesResult<HttpResponse> {
        locked(&self.requests).push(request);

        let response = {
            let mut responses = locked(&self.responses);
            if responses.is_empty() {
                self.default_response.clone()
            } else {
                Some(responses.remove(0))
            }
        };

        match response {
            Some(mock) => Ok(HttpResponse::new(mock.status, mock.headers, mock.body)),
            None => Err(SesError::Transport {
                message: "No mock response available".to_string(),
                source: None,
            }),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued_responses", &locked(&self.responses).len())
            .field("recorded_requests", &locked(&self.requests).len())
            .finish()
    }
}
