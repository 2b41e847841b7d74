//! reqwest-backed page source

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::{
    errors::{FetchError, FetchResult},
    types::{PageQuery, PageResponse, Record},
    PageSource,
};
use crate::config::Config;
use crate::version;

/// POSTs page queries to a fixed endpoint with a bearer credential
#[derive(Clone)]
pub struct HttpPageSource {
    client: Client,
    endpoint: String,
    token: String,
    extra_headers: HeaderMap,
}

impl HttpPageSource {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Option<Duration>,
        extra_headers: &HashMap<String, String>,
    ) -> FetchResult<Self> {
        let mut builder = Client::builder().user_agent(version::user_agent());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim().to_string(),
            token: token.into().trim().to_string(),
            extra_headers: Self::build_headers(extra_headers)?,
        })
    }

    /// Create a source from the loaded configuration
    pub fn from_config(config: &Config) -> FetchResult<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| FetchError::Config("no endpoint configured".to_string()))?;
        let token = config
            .token
            .clone()
            .ok_or_else(|| FetchError::Config("no bearer token configured".to_string()))?;

        Self::new(
            endpoint,
            token,
            config.request_timeout_secs.map(Duration::from_secs),
            &config.extra_headers,
        )
    }

    fn build_headers(extra: &HashMap<String, String>) -> FetchResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::Config(format!("invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::Config(format!("invalid value for header '{}': {}", name, e)))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Keep whatever the server said about the failure, JSON if it parses
    fn error_body(text: String) -> Option<Value> {
        if text.trim().is_empty() {
            return None;
        }
        Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, query: &PageQuery) -> FetchResult<Vec<Record>> {
        debug!(
            "POST {} page={} size={}",
            self.endpoint, query.page_number, query.page_size
        );

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.extra_headers.clone())
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.token)
            .json(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: Self::error_body(text),
            });
        }

        let bytes = response.bytes().await?;
        let page: PageResponse = serde_json::from_slice(&bytes)?;
        Ok(page.main_categories)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{RecordKey, SortDirection};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP exchange and hand back the raw request
    async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/categories", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);

                let text = String::from_utf8_lossy(&raw);
                if let Some(split) = text.find("\r\n\r\n") {
                    let content_length = text[..split]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= split + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&raw).into_owned()
        });

        (url, handle)
    }

    fn query(page: u32) -> PageQuery {
        PageQuery {
            page_number: page,
            page_size: 10,
            order_by: "Sequence".to_string(),
            direction: SortDirection::Asc,
        }
    }

    #[tokio::test]
    async fn test_fetch_page_sends_query_and_credentials() {
        let body = json!({
            "mainCategories": [
                {"id": 1, "mainCatName": "Books", "sequence": 1},
                {"id": 2, "mainCatName": "Games", "sequence": 2}
            ]
        })
        .to_string();
        let (url, server) = serve_once("HTTP/1.1 200 OK", body).await;

        let mut headers = HashMap::new();
        headers.insert("X-Tenant".to_string(), "acme".to_string());
        let source = HttpPageSource::new(url, "secret-token", None, &headers).unwrap();

        let records = source.fetch_page(&query(2)).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, RecordKey::Number(serde_json::Number::from(2)));
        assert_eq!(records[1].display_name(), "Games");

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /categories"));
        assert!(lower.contains("authorization: bearer secret-token"));
        assert!(lower.contains("content-type: application/json"));
        assert!(lower.contains("x-tenant: acme"));

        let payload = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let payload: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(
            payload,
            json!({"pageNumber": 2, "pageSize": 10, "orderBy": "Sequence", "direction": "asc"})
        );
    }

    #[tokio::test]
    async fn test_fetch_page_keeps_server_error_body() {
        let body = json!({"error": "token expired"}).to_string();
        let (url, server) = serve_once("HTTP/1.1 401 Unauthorized", body).await;

        let source = HttpPageSource::new(url, "stale", None, &HashMap::new()).unwrap();
        let err = source.fetch_page(&query(1)).await.unwrap_err();
        server.await.unwrap();

        match &err {
            FetchError::Status { status, .. } => assert_eq!(*status, 401),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.server_body(), Some(&json!({"error": "token expired"})));
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_unexpected_shape() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", json!({"rows": []}).to_string()).await;

        let source = HttpPageSource::new(url, "t", None, &HashMap::new()).unwrap();
        let err = source.fetch_page(&query(1)).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_invalid_extra_header_is_config_error() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "x".to_string());

        let result = HttpPageSource::new("http://localhost", "t", None, &headers);
        assert!(matches!(result, Err(FetchError::Config(_))));
    }

    #[test]
    fn test_from_config_requires_endpoint_and_token() {
        let config = Config::default();
        assert!(matches!(
            HttpPageSource::from_config(&config),
            Err(FetchError::Config(_))
        ));

        let config = Config {
            endpoint: Some("https://api.example.com/categories".to_string()),
            token: Some("t".to_string()),
            ..Config::default()
        };
        let source = HttpPageSource::from_config(&config).unwrap();
        assert_eq!(source.endpoint(), "https://api.example.com/categories");
    }

    #[tokio::test]
    async fn test_padded_endpoint_is_trimmed() {
        let (url, request) = serve_once("HTTP/1.1 200 OK", json!({"mainCategories": []}).to_string()).await;

        let config = Config {
            endpoint: Some(format!("  {} \n", url)),
            token: Some("t".to_string()),
            ..Config::default()
        };
        let source = HttpPageSource::from_config(&config).unwrap();
        assert_eq!(source.endpoint(), url);

        let records = source.fetch_page(&query(1)).await.unwrap();
        assert!(records.is_empty());
        assert!(request.await.unwrap().starts_with("POST "));
    }
}
