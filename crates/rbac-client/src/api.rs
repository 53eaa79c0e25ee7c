//! HTTP client for the RBAC Admin API

use rbac_core::traits::Id;
use rbac_models::{
    CreatedResponse, ErrorBody, LoginRequest, MessageResponse, NewUser, SessionUser,
    TokenResponse, UpdatedResponse, User, UserPatch,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx answer; `message` is the server's `error` text
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// The text to show the user
    pub fn message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Http(e) => e.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Client for `/api/v1`. Once logged in, the access token is sent as a
/// Bearer header.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let message = match resp.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
            };
            tracing::debug!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// POST /api/v1/auth/login; keeps the returned token
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<TokenResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let token: TokenResponse = self
            .send(self.request(Method::POST, "/api/v1/auth/login").json(&body))
            .await?;

        self.token = Some(token.access_token.clone());
        Ok(token)
    }

    /// GET /api/v1/auth/check
    pub async fn check(&self) -> ClientResult<SessionUser> {
        self.send(self.request(Method::GET, "/api/v1/auth/check"))
            .await
    }

    /// POST /api/v1/auth/logout. The token is dropped even if the call
    /// fails.
    pub async fn logout(&mut self) -> ClientResult<MessageResponse> {
        let result = self
            .send(self.request(Method::POST, "/api/v1/auth/logout"))
            .await;
        self.token = None;
        result
    }

    /// GET /api/v1/users
    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.send(self.request(Method::GET, "/api/v1/users")).await
    }

    /// GET /api/v1/users?id=N
    pub async fn get_user(&self, id: Id) -> ClientResult<User> {
        self.send(
            self.request(Method::GET, "/api/v1/users")
                .query(&[("id", id)]),
        )
        .await
    }

    /// POST /api/v1/users
    pub async fn create_user(&self, user: &NewUser) -> ClientResult<CreatedResponse> {
        self.send(self.request(Method::POST, "/api/v1/users").json(user))
            .await
    }

    /// PUT /api/v1/users?id=N
    pub async fn update_user(&self, id: Id, patch: &UserPatch) -> ClientResult<UpdatedResponse> {
        self.send(
            self.request(Method::PUT, "/api/v1/users")
                .query(&[("id", id)])
                .json(patch),
        )
        .await
    }

    /// DELETE /api/v1/users?id=N
    pub async fn delete_user(&self, id: Id) -> ClientResult<MessageResponse> {
        self.send(
            self.request(Method::DELETE, "/api/v1/users")
                .query(&[("id", id)]),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert!(client.token().is_none());
    }

    #[test]
    fn test_token_handling() {
        let mut client = ApiClient::new("http://localhost:3000");
        client.set_token("abc");
        assert_eq!(client.token(), Some("abc"));
        client.clear_token();
        assert!(client.token().is_none());
    }

    #[test]
    fn test_api_error_accessors() {
        let err = ClientError::Api {
            status: 401,
            message: "No token provided".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.message(), "No token provided");
        assert_eq!(err.to_string(), "API error (401): No token provided");
    }
}
