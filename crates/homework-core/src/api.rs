//! Client for the Practicum `homework_statuses` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, WatchError};
use crate::notify::StatusSource;

/// Practicum homework status endpoint.
pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one Practicum OAuth token.
#[derive(Clone)]
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    /// Create a client for the default endpoint.
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WatchError::Transport {
                endpoint: ENDPOINT.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint: ENDPOINT.to_string(),
            token: token.into(),
        })
    }

    /// Point the client at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The endpoint this client queries.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, from_date: i64) -> reqwest::RequestBuilder {
        self.http
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
    }

    /// Query statuses changed since `from_date` and return the JSON body.
    pub async fn get_api_answer(&self, from_date: i64) -> Result<Value> {
        debug!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let response = self
            .request(from_date)
            .send()
            .await
            .map_err(|e| WatchError::Transport {
                endpoint: self.endpoint.clone(),
                message: describe(e),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(WatchError::BadStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| WatchError::MalformedBody {
                endpoint: self.endpoint.clone(),
                message: describe(e),
            })
    }
}

/// Render a reqwest error with its cause chain and without the request URL.
///
/// The URL carries `from_date`, so leaving it in would make the same outage
/// produce a different message on every cycle.
fn describe(e: reqwest::Error) -> String {
    let e = e.without_url();
    let mut message = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value> {
        self.get_api_answer(from_date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    #[test]
    fn test_request_shape() {
        let client = PracticumClient::new("secret-token", DEFAULT_TIMEOUT).unwrap();
        let request = client.request(1_549_962_000).build().unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://practicum.yandex.ru/api/user_api/homework_statuses/?from_date=1549962000"
        );
        assert_eq!(
            request.headers()["Authorization"].to_str().unwrap(),
            "OAuth secret-token"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = PracticumClient::new("secret-token", DEFAULT_TIMEOUT).unwrap();
        assert!(!format!("{:?}", client).contains("secret-token"));
    }

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (request_tx, request_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let _ = request_tx.send(String::from_utf8_lossy(&buf[..n]).to_string());
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        (format!("http://{addr}/homework_statuses/"), request_rx)
    }

    /// An endpoint on a port nothing listens on.
    async fn closed_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/homework_statuses/")
    }

    #[tokio::test]
    async fn test_ok_response_is_parsed() {
        let (endpoint, request) =
            serve_once("200 OK", r#"{"homeworks":[],"current_date":1700000000}"#).await;
        let client = PracticumClient::new("token-1", DEFAULT_TIMEOUT)
            .unwrap()
            .with_endpoint(endpoint);

        let value = client.get_api_answer(123).await.unwrap();
        assert_eq!(value, json!({ "homeworks": [], "current_date": 1_700_000_000 }));

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /homework_statuses/?from_date=123 "));
        assert!(request.contains("authorization: oauth token-1"));
    }

    #[tokio::test]
    async fn test_non_ok_status_is_bad_status() {
        let (endpoint, _request) = serve_once("500 Internal Server Error", "{}").await;
        let client = PracticumClient::new("t", DEFAULT_TIMEOUT)
            .unwrap()
            .with_endpoint(endpoint.clone());

        let err = client.get_api_answer(0).await.unwrap_err();
        assert_eq!(
            err,
            WatchError::BadStatus {
                endpoint,
                status: 500
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let (endpoint, _request) = serve_once("200 OK", "<html>maintenance</html>").await;
        let client = PracticumClient::new("t", DEFAULT_TIMEOUT)
            .unwrap()
            .with_endpoint(endpoint.clone());

        match client.get_api_answer(0).await.unwrap_err() {
            WatchError::MalformedBody {
                endpoint: reported,
                message,
            } => {
                assert_eq!(reported, endpoint);
                assert!(!message.is_empty());
            }
            other => panic!("expected malformed body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let endpoint = closed_endpoint().await;
        let client = PracticumClient::new("t", Duration::from_secs(2))
            .unwrap()
            .with_endpoint(endpoint.clone());

        match client.get_api_answer(0).await.unwrap_err() {
            WatchError::Transport {
                endpoint: reported,
                message,
            } => {
                assert_eq!(reported, endpoint);
                // Cause chain is included, the query string is not.
                assert!(message.starts_with("error sending request: "), "{message}");
                assert!(!message.contains("from_date"), "{message}");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_error_independent_of_cursor() {
        let endpoint = closed_endpoint().await;
        let client = PracticumClient::new("t", Duration::from_secs(2))
            .unwrap()
            .with_endpoint(endpoint);

        let first = client.get_api_answer(1_700_000_000).await.unwrap_err();
        let second = client.get_api_answer(1_700_000_001).await.unwrap_err();
        assert_eq!(first, second);
    }
}
