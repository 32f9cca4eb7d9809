use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::shared::errors::SwapError;
use crate::shared::utils::with_timeout;

/// Generic JSON-over-HTTP getter
pub struct DataFetcher {
    http_client: Client,
    timeout: Duration,
}

impl DataFetcher {
    pub fn new(timeout: Duration) -> Result<Self, SwapError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SwapError::Fetch {
                url: String::new(),
                reason: format!("can't build HTTP client: {}", e),
            })?;
        Ok(Self { http_client, timeout })
    }

    /// GET `url` and decode the body as `T`.
    ///
    /// Non-2xx statuses are `Fetch` errors, bodies that don't match `T` are `Decode` errors.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SwapError> {
        with_timeout(url, self.timeout, self.get_json_inner(url)).await
    }

    async fn get_json_inner<T: DeserializeOwned>(&self, url: &str) -> Result<T, SwapError> {
        // the client deadline equals the outer one; either firing is a Timeout
        let transport_err = |e: reqwest::Error| {
            if e.is_timeout() {
                SwapError::Timeout {
                    operation: url.to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                }
            } else {
                SwapError::Fetch {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        debug!("GET {}", url);
        let response = self.http_client.get(url).send().await.map_err(transport_err)?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {} failed with status {}", url, status);
            return Err(SwapError::Fetch {
                url: url.to_string(),
                reason: format!("status {}", status),
            });
        }

        let body = response.text().await.map_err(transport_err)?;
        serde_json::from_str(&body).map_err(|e| SwapError::Decode {
            source_name: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot HTTP server: answers the first request with `response`,
    /// or holds the connection open without replying when it is `None`
    async fn serve_once(response: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            match response {
                Some(r) => {
                    let _ = socket.write_all(r.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
                None => tokio::time::sleep(Duration::from_secs(5)).await,
            }
        });
        format!("http://{}/tokens", addr)
    }

    fn fetcher(ms: u64) -> DataFetcher {
        DataFetcher::new(Duration::from_millis(ms)).unwrap()
    }

    #[tokio::test]
    async fn test_get_json_decodes_body() {
        let url = serve_once(Some(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 8\r\nConnection: close\r\n\r\n{\"a\": 1}",
        ))
        .await;
        let v: serde_json::Value = fetcher(2_000).get_json(&url).await.unwrap();
        assert_eq!(v["a"], 1);
    }

    #[tokio::test]
    async fn test_get_json_non_2xx_is_fetch_error() {
        let url = serve_once(Some("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")).await;
        let err = fetcher(2_000).get_json::<serde_json::Value>(&url).await.unwrap_err();
        match err {
            SwapError::Fetch { url: u, reason } => {
                assert_eq!(u, url);
                assert!(reason.contains("404"), "{}", reason);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_json_malformed_body_is_decode_error() {
        let url = serve_once(Some(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot json!",
        ))
        .await;
        let err = fetcher(2_000).get_json::<serde_json::Value>(&url).await.unwrap_err();
        assert!(matches!(err, SwapError::Decode { ref source_name, .. } if *source_name == url));
    }

    #[tokio::test]
    async fn test_get_json_silent_server_times_out() {
        let url = serve_once(None).await;
        let err = fetcher(100).get_json::<serde_json::Value>(&url).await.unwrap_err();
        assert!(matches!(err, SwapError::Timeout { timeout_ms: 100, .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_get_json_connection_refused_is_fetch_error() {
        // bind then drop to get a port nobody listens on
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
        let err = fetcher(2_000)
            .get_json::<serde_json::Value>(&format!("http://{}/pools", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::Fetch { .. }), "{:?}", err);
    }
}
