use async_trait::async_trait;
use reqwest::Response;
use serde::Serialize;

use crate::{
    error::Error,
    form::FormValues,
    http::{ReceivedResponse, ResponseExt},
    response::ResponseBody,
};

pub const DEFAULT_SIGNUP_PATH: &str = "/api/auth/signup";

/// The remote service performing account creation and server-side validation.
#[async_trait]
pub trait SignupEndpoint: Send + Sync {
    /// Issue exactly one signup request. `Err` means no usable response was
    /// received (connection, DNS, or an undecodable body).
    async fn sign_up(&self, values: &FormValues) -> Result<ReceivedResponse<ResponseBody>, Error>;
}

#[derive(Debug, Clone)]
pub struct SignupClient {
    http: reqwest::Client,
    base_url: String,
    signup_path: String,
}

impl SignupClient {
    pub fn new(base_url: String) -> Self {
        Self::with_path(base_url, DEFAULT_SIGNUP_PATH.to_string())
    }

    pub fn with_path(base_url: String, signup_path: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            signup_path,
        }
    }

    pub fn url(&self) -> String {
        if self.signup_path.starts_with('/') {
            format!("{}{}", self.base_url, self.signup_path)
        } else {
            format!("{}/{}", self.base_url, self.signup_path)
        }
    }

    async fn post_json<T: Serialize + Sync>(&self, url: &str, body: &T) -> Result<Response, Error> {
        let response = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        Ok(response)
    }
}

#[async_trait]
impl SignupEndpoint for SignupClient {
    async fn sign_up(&self, values: &FormValues) -> Result<ReceivedResponse<ResponseBody>, Error> {
        let url = self.url();
        tracing::debug!("POST {}", url);
        let response = self.post_json(&url, values).await?.json_any_status().await?;
        tracing::debug!("signup response status={}", response.status_code);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn values() -> FormValues {
        FormValues {
            name: "Ada".to_string(),
            username: "ada".to_string(),
            password: "hunter22!".to_string(),
            confirm_password: "hunter22!".to_string(),
        }
    }

    #[test]
    fn url_joins_base_and_path() {
        let client = SignupClient::new("http://localhost:3000/".to_string());
        assert_eq!(client.url(), "http://localhost:3000/api/auth/signup");
        let client =
            SignupClient::with_path("http://localhost:3000".to_string(), "v1/signup".to_string());
        assert_eq!(client.url(), "http://localhost:3000/v1/signup");
    }

    #[tokio::test]
    async fn posts_json_body_with_content_type() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/auth/signup")
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "name": "Ada",
                        "username": "ada",
                        "password": "hunter22!",
                        "confirm_password": "hunter22!",
                    }));
                then.status(200).json_body(json!({}));
            })
            .await;

        let client = SignupClient::new(server.base_url());
        let response = client.sign_up(&values()).await.unwrap();

        mock.assert_async().await;
        assert!(response.is_success());
        assert_eq!(response.body, ResponseBody::default());
    }

    #[tokio::test]
    async fn reads_body_of_failure_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/signup");
                then.status(409).json_body(json!({ "error": "User already exists" }));
            })
            .await;

        let client = SignupClient::new(server.base_url());
        let response = client.sign_up(&values()).await.unwrap();

        assert_eq!(response.status_code, 409);
        assert_eq!(response.body.error.as_deref(), Some("User already exists"));
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/signup");
                then.status(502).body("<html>Bad Gateway</html>");
            })
            .await;

        let client = SignupClient::new(server.base_url());
        let err = client.sign_up(&values()).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let client = SignupClient::new("http://127.0.0.1:9".to_string());
        let err = client.sign_up(&values()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
