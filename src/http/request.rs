//! Request types for the SES query API.
//!
//! Every SES call is a form-encoded POST whose body is an ordered list of
//! key/value pairs. [`QueryParams`] builds that list, including the
//! positional `member.N` flattening the query API uses for lists.

use std::collections::HashMap;

use crate::error::{SesError, SesResult};
use crate::types::Action;

/// HTTP methods used by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
}

impl HttpMethod {
    /// The method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A transport-level HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a new request.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body decoded back into form pairs.
    ///
    /// Mostly useful for inspecting recorded requests in tests.
    pub fn form_params(&self) -> Vec<(String, String)> {
        self.body
            .as_deref()
            .and_then(|body| serde_urlencoded::from_bytes(body).ok())
            .unwrap_or_default()
    }
}

/// Ordered key/value parameters of one query API call.
///
/// Keys are unique; inserting an existing key replaces its value in place.
///
/// # Examples
///
/// ```rust
/// use ses_archiver::http::QueryParams;
/// use ses_archiver::types::Action;
///
/// let mut params = QueryParams::for_action(Action::SendEmail);
/// params.push_members("Destination.ToAddresses", ["a@x.com", "b@x.com"]);
///
/// assert_eq!(params.get("Destination.ToAddresses.member.1"), Some("a@x.com"));
/// assert_eq!(params.get("Destination.ToAddresses.member.2"), Some("b@x.com"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parameter list starting with `Action=<action>`.
    pub fn for_action(action: Action) -> Self {
        let mut params = Self::new();
        params.insert("Action", action.as_str());
        params
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Insert a parameter only when a value is present.
    pub fn insert_opt(&mut self, key: &str, value: Option<impl Into<String>>) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Flatten a list into `<key>.member.<n>` entries, `n` starting at 1.
    pub fn push_members<I, S>(&mut self, key: &str, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (index, item) in items.into_iter().enumerate() {
            self.insert(format!("{}.member.{}", key, index + 1), item);
        }
        self
    }

    /// Flatten a list of records into `<key>.member.<n>.<field>` entries.
    ///
    /// ```rust
    /// use ses_archiver::http::QueryParams;
    ///
    /// let mut params = QueryParams::new();
    /// params.push_member_entries("Tags", [vec![("Name", "campaign"), ("Value", "spring")]]);
    ///
    /// assert_eq!(params.get("Tags.member.1.Name"), Some("campaign"));
    /// assert_eq!(params.get("Tags.member.1.Value"), Some("spring"));
    /// ```
    pub fn push_member_entries<I, E, K, V>(&mut self, key: &str, items: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (index, entry) in items.into_iter().enumerate() {
            for (field, value) in entry {
                self.insert(format!("{}.member.{}.{}", key, index + 1, field.as_ref()), value);
            }
        }
        self
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `Action` parameter, if set.
    pub fn action(&self) -> Option<&str> {
        self.get("Action")
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Encode as an `application/x-www-form-urlencoded` body.
    pub fn to_form_body(&self) -> SesResult<String> {
        serde_urlencoded::to_string(&self.pairs).map_err(|e| SesError::Validation {
            message: format!("Failed to encode request parameters: {}", e),
            field: None,
        })
    }
}
