use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// Why a conversion request did not produce a reply
#[derive(Debug, thiserror::Error)]
pub enum SlangError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Anything that can turn user text into slang.
#[async_trait]
pub trait SlangBackend: Send + Sync {
    async fn convert(&self, text: &str) -> Result<String, SlangError>;
}

#[derive(Serialize)]
struct ConvertRequest<'a> {
    text: &'a str,
}

/// HTTP client for the `/slang` endpoint
#[derive(Clone)]
pub struct SlangClient {
    client: Client,
    base_url: String,
}

impl SlangClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SlangBackend for SlangClient {
    async fn convert(&self, text: &str) -> Result<String, SlangError> {
        let url = format!("{}/slang", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ConvertRequest { text })
            .send()
            .await
            .map_err(SlangError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SlangError::Status(status.as_u16()));
        }

        let body: Value = response.json().await.map_err(SlangError::Decode)?;
        Ok(reply_text(&body))
    }
}

/// Pull the converted text out of a success body.
///
/// Falls back to the compact JSON rendering of the whole body when there is
/// no usable `converted` field, so `{}` shows up as `{}`.
pub fn reply_text(body: &Value) -> String {
    match body.get("converted") {
        Some(Value::String(converted)) => converted.clone(),
        Some(converted) if !converted.is_null() => converted.to_string(),
        _ => match body {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn reply_prefers_converted_string() {
        assert_eq!(reply_text(&json!({"converted": "yo watdup"})), "yo watdup");
    }

    #[test]
    fn reply_falls_back_to_body() {
        assert_eq!(reply_text(&json!({})), "{}");
        assert_eq!(
            reply_text(&json!({"converted": null, "tokens": 2})),
            r#"{"converted":null,"tokens":2}"#
        );
    }

    #[test]
    fn reply_renders_non_string_converted() {
        assert_eq!(reply_text(&json!({"converted": 42})), "42");
        assert_eq!(reply_text(&json!("plain")), "plain");
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        assert_eq!(SlangClient::new("http://127.0.0.1:8000/").base_url(), "http://127.0.0.1:8000");
    }

    #[tokio::test]
    async fn posts_text_and_reads_converted() {
        let router = Router::new().route(
            "/slang",
            post(|Json(body): Json<Value>| async move {
                let text = body["text"].as_str().unwrap_or_default().to_string();
                Json(json!({ "converted": format!("echo:{text}") }))
            }),
        );
        let client = SlangClient::new(&serve(router).await);

        let reply = client.convert("yo what's good").await.unwrap();
        assert_eq!(reply, "echo:yo what's good");
    }

    #[tokio::test]
    async fn empty_object_falls_back() {
        let router = Router::new().route("/slang", post(|| async { Json(json!({})) }));
        let client = SlangClient::new(&serve(router).await);

        assert_eq!(client.convert("hi").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let router = Router::new().route(
            "/slang",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let client = SlangClient::new(&serve(router).await);

        let err = client.convert("hi").await.unwrap_err();
        assert!(matches!(err, SlangError::Status(500)));
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let router = Router::new().route("/slang", post(|| async { "not json" }));
        let client = SlangClient::new(&serve(router).await);

        let err = client.convert("hi").await.unwrap_err();
        assert!(matches!(err, SlangError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = SlangClient::new(&format!("http://{addr}"));

        let err = client.convert("hi").await.unwrap_err();
        assert!(matches!(err, SlangError::Transport(_)));
        assert!(!err.to_string().is_empty());
    }
}
