use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use super::common::{ApiErrorDetails, ApiErrorResponse};
use super::error::ApiError;
use crate::config::ProviderConfig;

const TOKEN_PATH: &str = "/token";

/// nullplatform API client
///
/// Created once per provider configuration and handed to every resource.
/// The bearer token obtained at creation never changes afterwards.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    auth_header: String,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    apikey: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl Client {
    /// Exchange the configured api key for a bearer token
    pub async fn authenticate(config: &ProviderConfig) -> Result<Self, ApiError> {
        let base_url = config
            .base_url()
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let http_client = build_http_client(config.insecure)?;

        let url = join(&base_url, TOKEN_PATH)?;
        tracing::debug!("Requesting access token from: {}", url);

        let response = http_client
            .post(url)
            .json(&TokenRequest {
                apikey: &config.api_key,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("Token exchange failed with HTTP {}: {}", status, text);
            return Err(ApiError::AuthError(format!(
                "token exchange returned HTTP {}: {}",
                status.as_u16(),
                backend_message(&text)
            )));
        }

        let text = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Failed to deserialize token response: {}", e);
            ApiError::ParseError(format!("Failed to parse token response: {}", e))
        })?;

        tracing::info!("Authenticated against {}", base_url);
        Ok(Self::from_parts(http_client, base_url, &token.access_token))
    }

    /// Client for an already issued token
    pub fn with_token(base_url: Url, token: &str, insecure: bool) -> Result<Self, ApiError> {
        let http_client = build_http_client(insecure)?;
        Ok(Self::from_parts(http_client, base_url, token))
    }

    fn from_parts(http_client: reqwest::Client, base_url: Url, token: &str) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                auth_header: format!("Bearer {}", token),
            }),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Parameters API operations
    pub fn parameters(&self) -> crate::api::parameter::ParametersApi<'_> {
        crate::api::parameter::ParametersApi::new(self)
    }

    /// Applications and scopes API operations
    pub fn applications(&self) -> crate::api::application::ApplicationsApi<'_> {
        crate::api::application::ApplicationsApi::new(self)
    }

    /// Issue one request and return the status with the decoded body
    ///
    /// An empty success body decodes to `None`. Non-success statuses are
    /// returned as errors; there is exactly one attempt per call.
    pub async fn make_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(u16, Option<Value>), ApiError> {
        let url = join(&self.inner.base_url, path)?;
        tracing::debug!("{} request to: {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method, url)
            .header(AUTHORIZATION, &self.inner.auth_header);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return self.handle_error_response(path, response).await;
        }

        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        if text.trim().is_empty() {
            return Ok((status.as_u16(), None));
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok((status.as_u16(), Some(value))),
            Err(e) => {
                tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
                Err(ApiError::ParseError(format!(
                    "Failed to parse response: {}",
                    e
                )))
            }
        }
    }

    /// Execute a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let (_, body) = self.make_request(Method::GET, path, None).await?;
        decode(body)
    }

    /// Execute a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        let (_, response) = self.make_request(Method::POST, path, Some(&body)).await?;
        decode(response)
    }

    /// Execute a PATCH request
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        let (_, response) = self.make_request(Method::PATCH, path, Some(&body)).await?;
        decode(response)
    }

    /// Execute a DELETE request, ignoring any response body
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.make_request(Method::DELETE, path, None)
            .await
            .map(|_| ())
    }

    async fn handle_error_response<T>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        tracing::debug!("API error response (HTTP {}): {}", status, text);

        match status {
            401 | 403 => Err(ApiError::AuthError(backend_message(&text))),
            404 => Err(ApiError::NotFound(path.to_string())),
            _ => {
                let parsed = serde_json::from_str::<ApiErrorResponse>(&text).ok();
                let message = parsed
                    .as_ref()
                    .and_then(|e| e.message.clone())
                    .unwrap_or(text);
                let details = parsed.map(|e| {
                    Box::new(ApiErrorDetails {
                        code: e.code,
                        errors: e.errors,
                    })
                });

                Err(ApiError::ApiError {
                    status,
                    message,
                    details,
                })
            }
        }
    }
}

fn build_http_client(insecure: bool) -> Result<reqwest::Client, ApiError> {
    Ok(reqwest::Client::builder()
        .danger_accept_invalid_certs(insecure)
        .build()?)
}

/// Join an API path onto the base URL, keeping any base path prefix
fn join(base_url: &Url, path: &str) -> Result<Url, ApiError> {
    base_url
        .join(path.trim_start_matches('/'))
        .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
}

fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::ParseError(format!("Failed to encode request: {}", e)))
}

fn decode<T: DeserializeOwned>(body: Option<Value>) -> Result<T, ApiError> {
    serde_json::from_value(body.unwrap_or(Value::Null)).map_err(|e| {
        tracing::error!("Failed to deserialize response: {}", e);
        ApiError::ParseError(format!("Failed to parse response: {}", e))
    })
}

/// The backend's `message` when the body is a JSON error, the raw text otherwise
fn backend_message(text: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(text)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| text.to_string())
}
