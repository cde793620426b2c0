//! REST client for the admin backend.
//!
//! Every endpoint lives under `{origin}/api/v1/web/` and answers with an
//! [`ApiResponse`] envelope. The client attaches the headers of an
//! [`AuthProvider`] to each request, maps non-2xx answers to
//! `Error::NetworkError` and malformed bodies to `Error::DecodeError`. It
//! neither caches nor retries.

mod endpoints;

use crate::config::AdminConfig;
use crate::error::{Error, Result};
use crate::model::FileUpload;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Path of the admin API below the origin.
pub const API_PREFIX: &str = "/api/v1/web";

/// Envelope of every backend answer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    pub status: String,
    #[serde(default)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            code: 200,
            status: "OK".to_string(),
            data,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            code: self.code,
            status: self.status,
            data: f(self.data),
        }
    }
}

/// Source of the headers that authenticate a request.
///
/// Token issuance and refresh happen elsewhere; the client only asks for the
/// current headers right before sending.
pub trait AuthProvider: Send + Sync {
    fn auth_headers(&self) -> Vec<(String, String)>;
}

/// Fixed bearer token and API key.
#[derive(Clone)]
pub struct StaticAuth {
    token: String,
    api_key: String,
}

impl StaticAuth {
    pub fn new(token: impl Into<String>, api_key: impl Into<String>) -> Self {
        StaticAuth {
            token: token.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for StaticAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAuth")
            .field("token", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl AuthProvider for StaticAuth {
    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), format!("Bearer {}", self.token)),
            ("x-api-key".to_string(), self.api_key.clone()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }
}

/// reqwest-backed client for the admin API.
#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth: Arc<dyn AuthProvider>,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RestClient {
    /// Client for the API at `base_url` (already including [`API_PREFIX`]).
    pub fn new(base_url: impl Into<String>, auth: Arc<dyn AuthProvider>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to create HTTP client: {}", e)))?;
        Ok(RestClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Client for `{api_origin}/api/v1/web` authenticated with the configured
    /// token and API key.
    pub fn from_config(config: &AdminConfig) -> Result<Self> {
        let auth = StaticAuth::new(config.auth_token.clone(), config.api_key.clone());
        Self::new(config.base_url(), Arc::new(auth))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Auth headers as a `HeaderMap`. Multipart requests drop `Content-Type`
    /// so reqwest can set the form boundary.
    fn headers(&self, multipart: bool) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in self.auth.auth_headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::ConfigError(format!("invalid header name {}: {}", name, e)))?;
            if multipart && name == CONTENT_TYPE {
                continue;
            }
            let value = HeaderValue::from_str(&value)
                .map_err(|e| Error::ConfigError(format!("invalid value for {}: {}", name, e)))?;
            headers.insert(name, value);
        }
        if !headers.contains_key(AUTHORIZATION) {
            debug!("Sending request without an Authorization header");
        }
        Ok(headers)
    }

    fn request(&self, method: Method, endpoint: &str, multipart: bool) -> Result<RequestBuilder> {
        let url = self.url(endpoint);
        debug!("{} {}", method, url);
        Ok(self
            .client
            .request(method, url)
            .headers(self.headers(multipart)?))
    }

    pub async fn get<T>(&self, endpoint: &str) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned + Default,
    {
        let request = self.request(Method::GET, endpoint, false)?;
        self.send(endpoint, request).await
    }

    pub async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Default,
    {
        let request = self.request(Method::POST, endpoint, false)?.json(body);
        self.send(endpoint, request).await
    }

    pub async fn delete<T>(&self, endpoint: &str) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned + Default,
    {
        let request = self.request(Method::DELETE, endpoint, false)?;
        self.send(endpoint, request).await
    }

    /// POST a multipart form with `file` under `field` plus plain text fields.
    pub async fn post_file<T>(
        &self,
        endpoint: &str,
        field: &str,
        file: &FileUpload,
        text_fields: &[(&str, String)],
    ) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned + Default,
    {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| Error::ValidationError(format!("Invalid file type: {}", e)))?;
        let mut form = Form::new().part(field.to_string(), part);
        for (name, value) in text_fields {
            form = form.text(name.to_string(), value.clone());
        }
        let request = self.request(Method::POST, endpoint, true)?.multipart(form);
        self.send(endpoint, request).await
    }

    async fn send<T>(&self, endpoint: &str, request: RequestBuilder) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned + Default,
    {
        let outcome = async {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let message = format!(
                    "API Error: {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                );
                return Err(Error::http(status.as_u16(), message.trim_end()));
            }
            let body = response.bytes().await?;
            let envelope: ApiResponse<T> = serde_json::from_slice(&body)?;
            Ok(envelope)
        }
        .await;

        if let Err(e) = &outcome {
            warn!("API request {} failed: {}", endpoint, e);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HeaderList(Vec<(String, String)>);

    impl AuthProvider for HeaderList {
        fn auth_headers(&self) -> Vec<(String, String)> {
            self.0.clone()
        }
    }

    #[test]
    fn test_static_auth_headers() {
        let headers = StaticAuth::new("tok", "key").auth_headers();
        assert_eq!(
            headers,
            vec![
                ("Authorization".to_string(), "Bearer tok".to_string()),
                ("x-api-key".to_string(), "key".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ]
        );
    }

    #[test]
    fn test_multipart_headers_drop_content_type() {
        let auth = HeaderList(vec![
            ("Authorization".to_string(), "Bearer tok".to_string()),
            ("content-type".to_string(), "application/json".to_string()),
        ]);
        let client = RestClient::new("http://localhost/api/v1/web/", Arc::new(auth))
            .expect("client builds");

        let json = client.headers(false).expect("headers");
        assert_eq!(json.get(CONTENT_TYPE).map(|v| v.as_bytes()), Some(&b"application/json"[..]));

        let multipart = client.headers(true).expect("headers");
        assert!(multipart.get(CONTENT_TYPE).is_none());
        assert!(multipart.get(AUTHORIZATION).is_some());
    }

    #[test]
    fn test_url_joining() {
        let auth = Arc::new(StaticAuth::new("", ""));
        let client = RestClient::new("http://localhost/api/v1/web/", auth).expect("client builds");
        assert_eq!(client.base_url(), "http://localhost/api/v1/web");
        assert_eq!(client.url("get-roles"), "http://localhost/api/v1/web/get-roles");
        assert_eq!(client.url("/get-roles"), "http://localhost/api/v1/web/get-roles");
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: ApiResponse<Vec<String>> =
            serde_json::from_str(r#"{"code":200,"status":"OK"}"#).expect("decodes");
        assert!(envelope.data.is_empty());
    }
}
