//! HTTP client for the XBE API. [XbeClient] makes exactly one request per
//! call and returns the raw response body. Decoding the body is up to the
//! caller. There is no retry: any transport failure or non-2xx status is
//! returned as an [HttpError].

mod query;
#[cfg(test)]
mod tests;

pub use query::Query;

use crate::jsonapi::MEDIA_TYPE;
use bytes::Bytes;
use reqwest::{Client, Method, StatusCode, Url, header, redirect};
use std::time::Duration;
use thiserror::Error;
use tracing::{Instrument, info, info_span};
use xbe_config::HttpConfig;
use xbe_util::ResultTraced;

const USER_AGENT: &str = concat!("xbe/", env!("CARGO_PKG_VERSION"));

/// API client bound to a single base URL and (optional) token.
///
/// This is cheap to clone because reqwest's `Client` type uses `Arc`
/// internally. [reqwest::Client]
#[derive(Clone, Debug)]
pub struct XbeClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl XbeClient {
    pub fn new(
        config: &HttpConfig,
        base_url: Url,
        token: Option<String>,
    ) -> Result<Self, HttpError> {
        let redirect_policy = if config.follow_redirects {
            redirect::Policy::default()
        } else {
            redirect::Policy::none()
        };
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(redirect_policy);
        // Zero disables the timeout entirely
        if config.timeout > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout));
        }
        let client = builder.build().map_err(HttpError::Client)?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get(&self, path: &str, query: &Query) -> Result<Bytes, HttpError> {
        self.send(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: Vec<u8>) -> Result<Bytes, HttpError> {
        self.send(Method::POST, path, &Query::new(), Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: Vec<u8>) -> Result<Bytes, HttpError> {
        self.send(Method::PATCH, path, &Query::new(), Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Bytes, HttpError> {
        self.send(Method::DELETE, path, &Query::new(), None).await
    }

    /// Build the full URL for an API path. The path is appended to the base
    /// URL, so a base URL with a path prefix keeps its prefix
    pub fn url(&self, path: &str, query: &Query) -> Result<Url, HttpError> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw)
            .map_err(|error| HttpError::Url { url: raw, error })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, HttpError> {
        let url = self.url(path, query)?;
        let span = info_span!("HTTP request", %method, path);

        async {
            info!(%url, has_body = body.is_some(), "Sending request");
            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .header(header::ACCEPT, MEDIA_TYPE);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request =
                    request.header(header::CONTENT_TYPE, MEDIA_TYPE).body(body);
            }

            let transport = |error: reqwest::Error| HttpError::Transport {
                method: method.clone(),
                url: url.clone(),
                error,
            };
            let response = request.send().await.map_err(transport)?;
            let status = response.status();
            let body = response.bytes().await.map_err(transport)?;
            info!(status = status.as_u16(), size = body.len(), "Response");

            if status.is_success() {
                Ok(body)
            } else {
                Err(HttpError::Status {
                    method,
                    url,
                    status,
                    body: String::from_utf8_lossy(&body).into_owned(),
                })
            }
        }
        .instrument(span)
        .await
        .traced()
    }
}

/// An error that can occur while making a request
#[derive(Debug, Error)]
pub enum HttpError {
    /// HTTP client couldn't be initialized (e.g. TLS backend failure)
    #[error("Error initializing HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Invalid request URL `{url}`")]
    Url {
        url: String,
        #[source]
        error: url::ParseError,
    },

    /// Request never got a complete response: connection failure, timeout,
    /// body read error, etc.
    #[error("Error sending {method} {url}")]
    Transport {
        method: Method,
        url: Url,
        #[source]
        error: reqwest::Error,
    },

    /// Server responded with a non-2xx status. The body is retained because
    /// it usually holds the server's validation messages
    #[error("{method} {url} failed with status {status}")]
    Status {
        method: Method,
        url: Url,
        status: StatusCode,
        body: String,
    },
}

impl HttpError {
    /// Get the response body, if the server returned one
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } if !body.trim().is_empty() => Some(body),
            _ => None,
        }
    }

    /// Get the response status, if the server responded
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
