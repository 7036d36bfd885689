// SPDX-License-Identifier: MIT

//! HTTP transport for the portal backend
//!
//! Every request carries `Accept-Language` and, when the session holds one,
//! a bearer token. A 401 triggers a single token refresh followed by one
//! retry of the original request; when the refresh fails the session is
//! cleared and [`PortalError::SessionExpired`] is returned.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use super::models::auth::{RefreshTokenRequest, RefreshTokenResponse};
use super::models::PaginationRequest;
use super::session::Session;
use super::studies::Attachment;
use crate::config::PortalConfig;
use crate::error::{PortalError, Result};

const REFRESH_PATH: &str = "auth/token/refresh";

/// Request payload variants
pub(crate) enum Body<'a> {
    Empty,
    Json(Value),
    File(&'a str, &'a Attachment),
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    locale: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &PortalConfig, session: Session) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let base_url = normalize_base(&config.base_url)?;
        log::info!(
            "Portal client: base_url={}, locale={}",
            base_url,
            config.locale()
        );

        Ok(Self {
            http: builder.build()?,
            base_url,
            locale: config.locale(),
            session,
        })
    }

    /// Client whose session starts from the tokens in `config`
    pub fn from_config(config: &PortalConfig) -> Result<Self> {
        let session = Session::with_tokens(config.token.clone(), config.refresh_token.clone());
        Self::new(config, session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&PaginationRequest>,
    ) -> Result<T> {
        self.request(Method::GET, path, query, Body::Empty).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, None, Body::Json(body))
            .await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::POST, path, None, Body::Empty).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::DELETE, path, None, Body::Empty).await
    }

    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&PaginationRequest>,
        body: Body<'_>,
    ) -> Result<T> {
        let url = self.url(path)?;
        log::debug!("{} {}", method, url);

        let mut resp = self.send(&method, &url, query, &body).await?;

        if resp.status() == StatusCode::UNAUTHORIZED && self.session.is_authenticated().await {
            if self.refresh_tokens().await {
                log::debug!("Retrying {} {} with refreshed token", method, url);
                resp = self.send(&method, &url, query, &body).await?;
            } else {
                log::warn!("Token refresh failed, clearing session");
                self.session.clear().await;
                return Err(PortalError::SessionExpired);
            }
        }

        decode(resp).await
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        query: Option<&PaginationRequest>,
        body: &Body<'_>,
    ) -> Result<Response> {
        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, &self.locale);

        if let Some(token) = self.session.token().await {
            req = req.bearer_auth(token);
        }
        if let Some(q) = query {
            req = req.query(q);
        }

        req = match body {
            Body::Empty => req,
            Body::Json(value) => req.json(value),
            Body::File(part_name, attachment) => {
                let part = Part::bytes(attachment.bytes.clone())
                    .file_name(attachment.file_name.clone())
                    .mime_str(&attachment.mime)?;
                req.multipart(Form::new().part(part_name.to_string(), part))
            }
        };

        Ok(req.send().await?)
    }

    /// One refresh attempt; true when new tokens were stored
    async fn refresh_tokens(&self) -> bool {
        let (token, refresh_token) =
            match (self.session.token().await, self.session.refresh_token().await) {
                (Some(t), Some(r)) => (t, r),
                _ => return false,
            };

        let url = match self.url(REFRESH_PATH) {
            Ok(url) => url,
            Err(_) => return false,
        };

        let resp = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, &self.locale)
            .bearer_auth(&token)
            .json(&RefreshTokenRequest {
                refresh_token,
                token,
            })
            .send()
            .await;

        let resp = match resp {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                log::warn!("Token refresh rejected: {}", r.status());
                return false;
            }
            Err(e) => {
                log::warn!("Token refresh failed: {}", e);
                return false;
            }
        };

        match resp.json::<Value>().await.ok().and_then(|v| extract_tokens(&v)) {
            Some(tokens) => {
                self.session
                    .set_tokens(tokens.token, tokens.refresh_token)
                    .await;
                true
            }
            None => false,
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

fn normalize_base(base: &str) -> Result<Url> {
    let mut base = base.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?)
}

/// Tokens either at the top level or wrapped in `data`
fn extract_tokens(body: &Value) -> Option<RefreshTokenResponse> {
    let candidate = if body.get("token").is_some() {
        body
    } else {
        body.get("data")?
    };
    let tokens: RefreshTokenResponse = serde_json::from_value(candidate.clone()).ok()?;
    if tokens.token.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let bytes = resp.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<Value>(&bytes)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_default();
        log::warn!("API error {}: {}", status, message);
        return Err(PortalError::api(status.as_u16(), message));
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(Value::Null)
            .or_else(|_| serde_json::from_value(json!({})))
            .map_err(PortalError::from);
    }

    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_keeps_path() {
        let base = normalize_base("https://portal.example.com/api").unwrap();
        assert_eq!(
            base.join("Study/Initiate").unwrap().as_str(),
            "https://portal.example.com/api/Study/Initiate"
        );
    }

    #[test]
    fn test_extract_tokens_top_level_or_wrapped() {
        let top = json!({"token": "a", "refreshToken": "b"});
        let wrapped = json!({"code": 200, "data": {"token": "c", "refreshToken": "d"}});
        assert_eq!(extract_tokens(&top).unwrap().refresh_token, "b");
        assert_eq!(extract_tokens(&wrapped).unwrap().token, "c");
        assert!(extract_tokens(&json!({"message": "nope"})).is_none());
    }
}
