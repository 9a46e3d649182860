//! Kubernetes API client

use crate::config::ClusterConfig;
use crate::error::{parse_error_response, KubeError};
use crate::types::{SelfSubjectRulesReview, VersionInfo};
use rbaclens_core::SubjectRulesReviewStatus;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use std::time::Duration;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SELF_SUBJECT_RULES_REVIEWS_PATH: &str =
    "/apis/authorization.k8s.io/v1/selfsubjectrulesreviews";
const VERSION_PATH: &str = "/version";

// ============================================================================
// Client
// ============================================================================

/// Kubernetes API client
///
/// Requests are sent once. Failures are returned to the caller as-is.
#[derive(Clone)]
pub struct KubeClient {
    client: reqwest::Client,
    server: String,
    bearer_token: Option<String>,
}

impl std::fmt::Debug for KubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeClient")
            .field("server", &self.server)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl KubeClient {
    /// Create a builder for the client
    pub fn builder() -> KubeClientBuilder {
        KubeClientBuilder::new()
    }

    /// Create a client from a resolved [`ClusterConfig`]
    pub fn from_config(config: &ClusterConfig) -> Result<Self, KubeError> {
        let mut builder = Self::builder()
            .server(&config.server)
            .insecure_skip_tls_verify(config.insecure_skip_tls_verify);
        if let Some(token) = &config.token {
            builder = builder.bearer_token(token);
        }
        if let Some(pem) = &config.ca_pem {
            builder = builder.ca_pem(pem.clone());
        }
        builder.build()
    }

    /// Base URL of the API server
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Get a handle to the `authorization.k8s.io` API
    pub fn authorization(&self) -> Authorization<'_> {
        Authorization { client: self }
    }

    /// Get a handle to the discovery endpoints
    pub fn discovery(&self) -> Discovery<'_> {
        Discovery { client: self }
    }

    fn build_headers(&self) -> Result<HeaderMap, KubeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("rbaclens/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(token) = &self.bearer_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| KubeError::Configuration("Invalid bearer token".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Send one request and decode a successful JSON body
    async fn execute<T, B>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, KubeError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        let url = format!("{}{}", self.server, path);
        log::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .headers(self.build_headers()?);
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request
            .send()
            .await
            .map_err(KubeError::from_reqwest_error)?;
        let status = response.status();
        log::debug!("{} responded {}", url, status);

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                KubeError::InvalidResponse(format!("Failed to parse response: {}", e))
            });
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(parse_error_response(&error_body, status.as_u16()))
    }
}

/// Builder for [`KubeClient`]
///
/// The `server` is required; everything else is optional.
#[derive(Default)]
pub struct KubeClientBuilder {
    server: Option<String>,
    bearer_token: Option<String>,
    ca_pem: Option<Vec<u8>>,
    insecure_skip_tls_verify: bool,
    timeout: Option<Duration>,
}

impl KubeClientBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the API server base URL
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Authenticate with a bearer token
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Trust this PEM-encoded certificate authority
    pub fn ca_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.ca_pem = Some(pem.into());
        self
    }

    /// Accept any server certificate
    pub fn insecure_skip_tls_verify(mut self, insecure: bool) -> Self {
        self.insecure_skip_tls_verify = insecure;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<KubeClient, KubeError> {
        let server = self
            .server
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| KubeError::Configuration("API server URL is required".to_string()))?;

        let mut http = reqwest::Client::builder().timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT));

        if let Some(pem) = &self.ca_pem {
            let cert = reqwest::Certificate::from_pem(pem).map_err(|e| {
                KubeError::Configuration(format!("Invalid certificate authority: {}", e))
            })?;
            http = http.add_root_certificate(cert);
        }
        if self.insecure_skip_tls_verify {
            log::warn!("TLS certificate verification is disabled for {}", server);
            http = http.danger_accept_invalid_certs(true);
        }

        let client = http.build().map_err(|e| {
            KubeError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(KubeClient {
            client,
            server: server.trim_end_matches('/').to_string(),
            bearer_token: self.bearer_token.filter(|t| !t.is_empty()),
        })
    }
}

// ============================================================================
// Authorization API
// ============================================================================

/// `authorization.k8s.io/v1` handle
pub struct Authorization<'a> {
    client: &'a KubeClient,
}

impl Authorization<'_> {
    /// Ask the API server what the current identity may do in `namespace`
    pub async fn self_subject_rules_review(
        &self,
        namespace: &str,
    ) -> Result<SubjectRulesReviewStatus, KubeError> {
        let request = SelfSubjectRulesReview::for_namespace(namespace);
        let review: SelfSubjectRulesReview = self
            .client
            .execute(
                reqwest::Method::POST,
                SELF_SUBJECT_RULES_REVIEWS_PATH,
                Some(&request),
            )
            .await?;

        review.status.ok_or_else(|| {
            KubeError::InvalidResponse("SelfSubjectRulesReview has no status".to_string())
        })
    }
}

// ============================================================================
// Discovery API
// ============================================================================

/// Discovery endpoints handle
pub struct Discovery<'a> {
    client: &'a KubeClient,
}

impl Discovery<'_> {
    /// Fetch the API server build information
    pub async fn server_version(&self) -> Result<VersionInfo, KubeError> {
        self.client
            .execute::<VersionInfo, ()>(reqwest::Method::GET, VERSION_PATH, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_server() {
        let result = KubeClient::builder().bearer_token("t").build();
        assert!(matches!(result, Err(KubeError::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_blank_server() {
        let result = KubeClient::builder().server("  ").build();
        assert!(matches!(result, Err(KubeError::Configuration(_))));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = KubeClient::builder()
            .server("https://10.0.0.1:6443/")
            .build()
            .unwrap();
        assert_eq!(client.server(), "https://10.0.0.1:6443");
    }

    #[test]
    fn test_builder_ignores_empty_token() {
        let client = KubeClient::builder()
            .server("https://example.com")
            .bearer_token("")
            .build()
            .unwrap();
        assert!(client.bearer_token.is_none());
        assert!(!client.build_headers().unwrap().contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_headers_carry_bearer_token() {
        let client = KubeClient::builder()
            .server("https://example.com")
            .bearer_token("abc")
            .build()
            .unwrap();
        let headers = client.build_headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_token_characters() {
        let client = KubeClient::builder()
            .server("https://example.com")
            .bearer_token("bad\ntoken")
            .build()
            .unwrap();
        assert!(matches!(
            client.build_headers(),
            Err(KubeError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = ClusterConfig {
            server: "https://cluster.local".into(),
            token: Some("sa-token".into()),
            insecure_skip_tls_verify: true,
            namespace: "default".into(),
            ..Default::default()
        };
        let client = KubeClient::from_config(&config).unwrap();
        assert_eq!(client.server(), "https://cluster.local");
        assert_eq!(client.bearer_token.as_deref(), Some("sa-token"));
    }

    #[test]
    fn test_client_debug_redacts_token() {
        let client = KubeClient::builder()
            .server("https://example.com")
            .bearer_token("super-secret")
            .build()
            .unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
