//! HTTP transport shared by the Norman and Steve clients

use crate::error::{ClientError, Result};
use rancher_common::SteveError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Clone)]
pub struct Transport {
    client: reqwest::Client,
    base_url: Url,
    authorization: Option<HeaderValue>,
}

impl Transport {
    pub fn new(base_url: &str, insecure: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(insecure)
            .build()?;

        // A trailing slash keeps Url::join from dropping the last path segment
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');

        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
            authorization: None,
        })
    }

    /// Authenticate with `token`. Tokens that are not valid header values are rejected.
    pub fn with_token(mut self, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ClientError::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);
        self.authorization = Some(value);
        Ok(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative API path, or pass an absolute link through
    pub fn url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            Ok(Url::parse(path)?)
        } else {
            Ok(self.base_url.join(path.trim_start_matches('/'))?)
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(value) = &self.authorization {
            headers.insert(AUTHORIZATION, value.clone());
        }

        headers
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder> {
        let url = self.url(path)?;
        tracing::debug!(method = method.as_str(), url = url.as_str(), "Sending request");
        Ok(self.client.request(method, url).headers(self.headers()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.request(Method::GET, path)?.query(query).send().await?;
        Self::handle_response(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.request(Method::POST, path)?.json(body).send().await?;
        Self::handle_response(response).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.request(Method::PUT, path)?.json(body).send().await?;
        Self::handle_response(response).await
    }

    /// DELETE request. Any response body is discarded.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path)?.send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if response.status().is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<SteveError>(&body) {
            Ok(err) => (err.code, err.message),
            Err(_) => (String::new(), body),
        };

        tracing::debug!(status = status.as_u16(), %code, %message, "Request failed");

        match status {
            StatusCode::UNAUTHORIZED => ClientError::AuthFailed(message),
            StatusCode::NOT_FOUND => {
                if message.contains("not found") {
                    ClientError::NotFound(message)
                } else {
                    ClientError::NotFound(format!("{} (not found)", message))
                }
            }
            _ => ClientError::Api {
                status: status.as_u16(),
                code,
                message,
            },
        }
    }
}
