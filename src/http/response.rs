//! HTTP response type returned by transports.

use std::borrow::Cow;
use std::collections::HashMap;

use http::StatusCode;

/// A transport-level HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, keys lower-cased.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new response.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ses_archiver::http::HttpResponse;
    /// use std::collections::HashMap;
    ///
    /// let response = HttpResponse::new(200, HashMap::new(), b"<ok/>".to_vec());
    /// assert!(response.is_success());
    /// ```
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    /// The status as an `http::StatusCode`, if it is a valid code.
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status).ok()
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// The AWS request ID header, if present.
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-amzn-requestid")
            .or_else(|| self.header("x-amz-request-id"))
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_keys_normalised() {
        let mut headers = HashMap::new();
        headers.insert("X-Amzn-RequestId".to_string(), "req-42".to_string());

        let response = HttpResponse::new(200, headers, Vec::new());
        assert_eq!(response.header("x-amzn-requestid"), Some("req-42"));
        assert_eq!(response.request_id(), Some("req-42"));
    }

    #[test]
    fn test_status_helpers() {
        let response = HttpResponse::new(503, HashMap::new(), b"busy".to_vec());
        assert!(!response.is_success());
        assert_eq!(response.status_code(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(response.text(), "busy");
    }
}
