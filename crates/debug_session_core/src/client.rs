use crate::types::{ApiResponse, ErrorBody};
use crate::{DebugConfig, Result, TransportError};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// HTTP client for the debug-adapter server.
#[derive(Debug, Clone)]
pub struct DebugClient {
    config: DebugConfig,
    base_url: Url,
    http_client: reqwest::Client,
}

impl DebugClient {
    pub fn new(config: DebugConfig) -> Result<Self> {
        let base_url = Url::parse(&config.endpoint)
            .map_err(|e| TransportError::InvalidEndpoint(format!("{}: {e}", config.endpoint)))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidEndpoint(config.endpoint.clone()));
        }
        let http_client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            base_url,
            http_client,
        })
    }

    /// Appends `segments` to the endpoint path, percent-encoding each one.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn get<R: DeserializeOwned>(&self, segments: &[&str]) -> Result<R> {
        let url = self.url(segments);
        let request = self.http_client.get(url.clone());
        self.send_envelope(Method::GET, url.path(), request).await
    }

    pub async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<R> {
        let url = self.url(segments);
        let request = self.http_client.post(url.clone()).json(body);
        self.send_envelope(Method::POST, url.path(), request).await
    }

    /// Sends a DELETE and reports only whether the server answered 2xx.
    pub async fn delete(&self, segments: &[&str]) -> Result<()> {
        let url = self.url(segments);
        tracing::debug!("Sending request: method=DELETE, path={}", url.path());
        let response = self.send(self.http_client.delete(url), self.config.timeout).await?;
        if !response.status().is_success() {
            return Err(TransportError::InvalidResponse(format!(
                "HTTP error: {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Probes `segments` with the short health timeout.
    pub async fn probe(&self, segments: &[&str]) -> Result<()> {
        let timeout = self.config.health_timeout;
        let request = self.http_client.get(self.url(segments)).timeout(timeout);
        let response = self.send(request, timeout).await?;
        if !response.status().is_success() {
            return Err(TransportError::InvalidResponse(format!(
                "HTTP error: {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn send_envelope<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<R> {
        tracing::debug!("Sending request: method={}, path={}", method, path);

        let response = self.send(request, self.config.timeout).await?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify(e, self.config.timeout))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.error);
            return Err(match message {
                Some(message) => {
                    tracing::warn!(
                        "Server rejected request: path={}, status={}, error={}",
                        path,
                        status,
                        message
                    );
                    TransportError::Server(message)
                }
                None => TransportError::InvalidResponse(format!("HTTP error: {status}")),
            });
        }

        let envelope: ApiResponse<R> = serde_json::from_slice(&bytes)?;
        match envelope.into_result() {
            Ok(body) => {
                tracing::debug!("Request successful: method={}, path={}", method, path);
                Ok(body)
            }
            Err(e) => {
                tracing::warn!("Request failed: method={}, path={}, error={}", method, path, e);
                Err(e)
            }
        }
    }

    async fn send(&self, request: RequestBuilder, timeout: Duration) -> Result<Response> {
        request.send().await.map_err(|e| classify(e, timeout))
    }

    pub fn config(&self) -> &DebugConfig {
        &self.config
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Connection(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = DebugConfig::default();
        let client = DebugClient::new(config.clone()).unwrap();
        assert_eq!(client.config().endpoint, config.endpoint);
        assert_eq!(client.config().timeout, config.timeout);
        assert_eq!(client.config().health_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_url_encodes_each_segment() {
        let client = DebugClient::new(DebugConfig::default()).unwrap();
        assert_eq!(
            client.url(&["debug", "health"]).as_str(),
            "http://127.0.0.1:4000/debug/health"
        );
        assert_eq!(
            client.url(&["debug", "variables", "a/b?x#y"]).as_str(),
            "http://127.0.0.1:4000/debug/variables/a%2Fb%3Fx%23y"
        );
    }

    #[test]
    fn test_url_keeps_endpoint_base_path() {
        let config = DebugConfig::new("http://localhost:8080/adapter/", Duration::from_secs(1));
        let client = DebugClient::new(config).unwrap();
        assert_eq!(
            client.url(&["debug", "opcodes", "s-1"]).as_str(),
            "http://localhost:8080/adapter/debug/opcodes/s-1"
        );
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let config = DebugConfig::new("not a url", Duration::from_secs(1));
        let err = DebugClient::new(config).unwrap_err();
        assert!(matches!(err, TransportError::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        // Port 9 (discard) is not expected to have an HTTP listener.
        let config = DebugConfig::new("http://127.0.0.1:9", Duration::from_secs(2));
        let client = DebugClient::new(config).unwrap();

        let err = client.probe(&["debug", "health"]).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Connection(_) | TransportError::Timeout(_)
        ));
    }
}
