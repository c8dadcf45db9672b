//! Authentication and connection context for the REST API client

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::RequestBuilder;
use std::fmt;
use url::Url;

use crate::error::{RestClientError, RestClientResult};

/// Header carrying the n8n API key
pub const API_KEY_HEADER: &str = "x-n8n-api-key";

const JSON_MEDIA_TYPE: &str = "application/json";
const REDACTED: &str = "***";

/// Raw credential inputs, before an auth mode is chosen
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// Authentication methods supported by the API
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthMethod {
    /// API key sent in the `X-N8N-API-KEY` header
    ApiKey(String),
    /// HTTP basic authentication
    Basic { username: String, password: String },
    /// No authentication
    #[default]
    None,
}

impl AuthMethod {
    /// Choose exactly one auth mode.
    ///
    /// A non-empty API key wins; basic auth needs both a username and a
    /// password; anything else means no credentials.
    pub fn from_credentials(credentials: Credentials) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        if let Some(key) = non_empty(credentials.api_key) {
            return AuthMethod::ApiKey(key);
        }
        match (non_empty(credentials.username), non_empty(credentials.password)) {
            (Some(username), Some(password)) => AuthMethod::Basic { username, password },
            _ => AuthMethod::None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthMethod::ApiKey(_) => "api-key",
            AuthMethod::Basic { .. } => "basic",
            AuthMethod::None => "none",
        }
    }

    /// Apply the fixed header set of this mode
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> RestClientResult<()> {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));

        if let AuthMethod::ApiKey(key) = self {
            let mut value = HeaderValue::from_str(key)
                .map_err(|e| RestClientError::Auth(format!("invalid API key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }
        Ok(())
    }

    /// Attach per-request credentials that do not live in the header set
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            AuthMethod::Basic { username, password } => request.basic_auth(username, Some(password)),
            AuthMethod::ApiKey(_) | AuthMethod::None => request,
        }
    }
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::ApiKey(_) => f.debug_tuple("ApiKey").field(&REDACTED).finish(),
            AuthMethod::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &REDACTED)
                .finish(),
            AuthMethod::None => f.write_str("None"),
        }
    }
}

/// Base address, auth mode and header set shared by every request
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    base_url: String,
    base: Url,
    auth: AuthMethod,
    headers: HeaderMap,
}

impl ConnectionContext {
    /// Build a context without touching the network.
    ///
    /// Fails only on a malformed base address or a credential that cannot be
    /// carried in a header.
    pub fn new(base_url: &str, credentials: Credentials) -> RestClientResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(RestClientError::InvalidInput(format!(
                "unsupported scheme in base URL: {base_url}"
            )));
        }

        let auth = AuthMethod::from_credentials(credentials);
        let mut headers = HeaderMap::new();
        auth.apply_to_headers(&mut headers)?;

        Ok(Self {
            base_url,
            base,
            auth,
            headers,
        })
    }

    /// Base address without a trailing separator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthMethod {
        &self.auth
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Absolute URL for a path starting with `/`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Path relative to the base address, one segment per entry.
    ///
    /// Every segment is percent-escaped, so an id containing `/`, `?` or `#`
    /// stays a single segment.
    pub fn resource_path(&self, segments: &[&str]) -> RestClientResult<String> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        let prefix_len = url.path().trim_end_matches('/').len();

        url.path_segments_mut()
            .map_err(|_| {
                RestClientError::InvalidInput(format!(
                    "base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url.path()[prefix_len..].to_string())
    }
}

impl fmt::Display for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (auth: {})", self.base_url, self.auth.name())
    }
}
