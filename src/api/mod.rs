//! Customer Service Client
//!
//! HTTP bindings to the backend's read-only customer endpoints, organized by
//! endpoint. Every call returns a cold future: nothing is sent until it is
//! polled, and dropping it abandons the request.

mod search;
mod sort;

use reqwest::{Client, RequestBuilder, Url};
use thiserror::Error;

use crate::config::{ApiConfig, ConfigError};
use crate::models::Customer;

pub const SEARCH_PATH: &str = "/customers/search";
pub const SORT_PATH: &str = "/customers";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("customer service unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("customer service answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed customer payload: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Clone)]
pub struct CustomerClient {
    http: Client,
    base: Url,
    config: ApiConfig,
}

impl CustomerClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            http: Client::new(),
            base: config.base_url()?,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `{base}{path}[/{tail}]` with query and fragment cleared
    fn endpoint(&self, path: &str, tail: Option<&str>) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            if let Some(tail) = tail {
                segments.push(tail);
            }
        }
        url
    }
}

async fn get_customers(request: RequestBuilder, url: Url) -> Result<Vec<Customer>, ApiError> {
    log::debug!("[API] GET {url}");
    let response = request.send().await.map_err(ApiError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        log::warn!("[API] {url} answered {status}");
        return Err(ApiError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.bytes().await.map_err(ApiError::Transport)?;
    let customers: Vec<Customer> = serde_json::from_slice(&body).map_err(|e| {
        log::warn!("[API] {url} returned malformed body: {e}");
        ApiError::Decode(e)
    })?;
    log::debug!("[API] {url} returned {} customers", customers.len());
    Ok(customers)
}

/// One-connection HTTP responder for exercising the client over a real socket
#[cfg(test)]
pub(crate) mod test_server {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    pub(crate) struct OneShot {
        pub base_uri: String,
        pub accepted: Arc<AtomicUsize>,
        /// Request line of the single request served
        pub request_line: JoinHandle<String>,
    }

    impl OneShot {
        pub fn accepted(&self) -> usize {
            self.accepted.load(Ordering::SeqCst)
        }
    }

    pub(crate) async fn respond_once(status: &str, body: &str) -> OneShot {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();

        let request_line = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            counter.fetch_add(1, Ordering::SeqCst);

            let mut received = Vec::new();
            let mut chunk = [0u8; 1024];
            while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&received)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        OneShot {
            base_uri: format!("http://{addr}"),
            accepted,
            request_line,
        }
    }
}
