use crate::config::toml_config::SessionConfig;
use crate::domain::model::SessionInfo;
use crate::domain::ports::SessionProvider;
use crate::utils::error::{ExternalUsersError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// `{"session": {"valid": bool, "email": ..., "user": {"username": ...}}}`
#[derive(Debug, Deserialize)]
struct CurrentSessionResponse {
    session: Option<SessionPayload>,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    #[serde(default)]
    valid: bool,
    email: Option<String>,
    user: Option<SessionUser>,
}

#[derive(Debug, Deserialize)]
struct SessionUser {
    username: String,
}

/// Resolves session tokens through the provider's `currentSession` endpoint.
pub struct HttpSessionClient {
    client: Client,
    endpoint_path: String,
    token_field: String,
}

impl HttpSessionClient {
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint_path: config.endpoint_path.clone(),
            token_field: config.token_field.clone(),
        })
    }

    pub fn endpoint_url(&self, api_root: &str) -> String {
        format!("{}{}", api_root.trim_end_matches('/'), self.endpoint_path)
    }

    fn decode(body: &str) -> Result<Option<SessionInfo>> {
        let response: CurrentSessionResponse = serde_json::from_str(body)?;

        let Some(session) = response.session else {
            return Ok(None);
        };
        if !session.valid {
            return Ok(None);
        }

        // 有效的 session 卻沒有 user 欄位時視同未登入
        Ok(session.user.map(|user| SessionInfo {
            username: user.username,
            email: session.email,
        }))
    }
}

#[async_trait]
impl SessionProvider for HttpSessionClient {
    async fn current_session(
        &self,
        api_root: &str,
        auth_token: &str,
    ) -> Result<Option<SessionInfo>> {
        let url = self.endpoint_url(api_root);
        tracing::debug!("Resolving session via {}", url);

        let response = self
            .client
            .post(&url)
            .form(&[(self.token_field.as_str(), auth_token)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Session API response status: {}", status);
        if !status.is_success() {
            return Err(ExternalUsersError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Self::decode(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client() -> HttpSessionClient {
        HttpSessionClient::new(&SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoint_url_joins_root_and_path() {
        let client = client();
        assert_eq!(
            client.endpoint_url("https://omegaup.com"),
            "https://omegaup.com/api/session/currentSession/"
        );
        assert_eq!(
            client.endpoint_url("https://omegaup.com/"),
            "https://omegaup.com/api/session/currentSession/"
        );
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let body = r#"{"status":"ok","session":{"valid":true,"email":"a@b.c","user":{"username":"alice","name":"Alice"},"identity":{}}}"#;
        let info = HttpSessionClient::decode(body).unwrap().unwrap();
        assert_eq!(info.username, "alice");
        assert_eq!(info.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_decode_valid_without_user_is_none() {
        let body = r#"{"session":{"valid":true,"email":"a@b.c","user":null}}"#;
        assert!(HttpSessionClient::decode(body).unwrap().is_none());

        let body = r#"{"status":"ok"}"#;
        assert!(HttpSessionClient::decode(body).unwrap().is_none());
    }

    #[test]
    fn test_decode_malformed_json_is_error() {
        let result = HttpSessionClient::decode("<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(ExternalUsersError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_current_session_valid() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/session/currentSession/")
                .header("content-type", "application/x-www-form-urlencoded")
                .body("auth_token=tok-123");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "session": {
                        "valid": true,
                        "email": "alice@example.com",
                        "user": {"username": "alice"}
                    }
                }));
        });

        let info = client()
            .current_session(&server.base_url(), "tok-123")
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(
            info,
            Some(SessionInfo {
                username: "alice".to_string(),
                email: Some("alice@example.com".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_current_session_invalid() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/api/session/currentSession/");
            then.status(200).json_body(serde_json::json!({
                "session": {"valid": false, "email": null, "user": null}
            }));
        });

        let info = client()
            .current_session(&server.base_url(), "expired")
            .await
            .unwrap();

        api_mock.assert();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn test_current_session_http_error() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/api/session/currentSession/");
            then.status(500);
        });

        let result = client()
            .current_session(&server.base_url(), "tok-123")
            .await;

        api_mock.assert();
        assert!(matches!(
            result,
            Err(ExternalUsersError::UnexpectedStatus { status: 500 })
        ));
    }

    #[tokio::test]
    async fn test_token_is_form_encoded() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/session/currentSession/")
                .body("auth_token=a%2Bb%3Dc%26d");
            then.status(200).json_body(serde_json::json!({
                "session": {"valid": false}
            }));
        });

        let info = client()
            .current_session(&server.base_url(), "a+b=c&d")
            .await
            .unwrap();

        api_mock.assert();
        assert!(info.is_none());
    }
}
