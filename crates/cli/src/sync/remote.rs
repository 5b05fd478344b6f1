// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request/response surface of the catalog service.
//!
//! Provides a trait-based seam that enables:
//! - A real HTTP client for production
//! - In-memory fake servers for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use cs_core::{ListResponse, Movie, QueryContext, QueryMode};
use tracing::debug;

/// Error type for remote operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    /// The host reports no network; nothing was sent.
    #[error("network is down")]
    NetworkDown,

    /// The request never produced an answer, or the server failed.
    #[error("server unreachable: {0}")]
    ServerUnreachable(String),

    /// The server answered with a client-error status.
    #[error("request rejected with status {status}")]
    RequestRejected { status: u16 },

    /// The response body did not match the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// True for failures that say nothing about the request itself.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RemoteError::NetworkDown | RemoteError::ServerUnreachable(_)
        )
    }
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`Remote`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// One page of a listing query.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub query: QueryContext,
}

impl PageRequest {
    /// Builds the request for the context's current page.
    pub fn from_context(query: &QueryContext) -> Self {
        PageRequest {
            page: query.page,
            size: query.page_size,
            query: query.clone(),
        }
    }

    /// Plain listing page, used by the full refresh walk.
    pub fn plain(page: u32, size: u32) -> Self {
        PageRequest {
            page,
            size,
            query: QueryContext::new(size),
        }
    }

    pub fn mode(&self) -> QueryMode {
        self.query.mode()
    }

    /// Query-string pairs for this request, in endpoint order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        match self.mode() {
            QueryMode::Plain => {}
            QueryMode::Filter => {
                let search = self.query.search_text().trim();
                if !search.is_empty() {
                    params.push(("search", search.to_string()));
                }
                for category in self.query.selected_categories() {
                    params.push(("categories", category.clone()));
                }
                if let Some(min) = self.query.min_rating() {
                    params.push(("rating", min.to_string()));
                }
                if let Some((field, direction)) = self.query.sort() {
                    params.push(("sort", direction.as_str().to_string()));
                    params.push(("field", field.as_str().to_string()));
                }
            }
            QueryMode::Sort => {
                if let Some((field, direction)) = self.query.sort() {
                    params.push(("field", field.as_str().to_string()));
                    params.push(("order", direction.as_str().to_string()));
                }
            }
        }
        params
    }
}

/// Listing result: the items plus the explicit "more remains" flag, if the
/// endpoint carries one.
pub type PageResponse = (Vec<Movie>, Option<bool>);

/// Operations the catalog service accepts.
///
/// This trait abstracts over the actual HTTP client, allowing for easy
/// testing with fake implementations.
pub trait Remote: Send + Sync {
    /// Lightweight reachability check.
    fn health(&self) -> RemoteFuture<'_, ()>;

    /// Fetch one page of the listing matching the request's mode.
    fn list_page(&self, request: PageRequest) -> RemoteFuture<'_, PageResponse>;

    /// Fetch one entity by id.
    fn fetch_one(&self, id: i64) -> RemoteFuture<'_, Movie>;

    /// Create an entity. Returns the confirmed entity if the response has one.
    fn create(&self, movie: Movie) -> RemoteFuture<'_, Option<Movie>>;

    /// Replace the entity with the given id.
    fn update(&self, id: i64, movie: Movie) -> RemoteFuture<'_, ()>;

    /// Delete the entity with the given id.
    fn delete(&self, id: i64) -> RemoteFuture<'_, ()>;
}

/// HTTP implementation of [`Remote`] using reqwest.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> RemoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::ServerUnreachable(e.to_string()))?;
        Ok(HttpRemote {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Path of the listing endpoint for a mode.
    pub fn list_path(mode: QueryMode) -> &'static str {
        match mode {
            QueryMode::Plain => "/api/main",
            QueryMode::Filter => "/api/movies/filter",
            QueryMode::Sort => "/api/movies/sort",
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> RemoteResult<reqwest::Response> {
        let response = builder.send().await.map_err(classify_transport)?;
        check_status(response.status())?;
        Ok(response)
    }
}

/// Maps a failed send to the remote error taxonomy.
fn classify_transport(err: reqwest::Error) -> RemoteError {
    if let Some(status) = err.status() {
        return match check_status(status) {
            Err(e) => e,
            Ok(()) => RemoteError::ServerUnreachable(err.to_string()),
        };
    }
    if err.is_decode() {
        return RemoteError::Decode(err.to_string());
    }
    RemoteError::ServerUnreachable(err.to_string())
}

/// Server errors look like an unreachable server; client errors are
/// rejections of this particular request.
pub(crate) fn check_status(status: reqwest::StatusCode) -> RemoteResult<()> {
    if status.is_success() {
        Ok(())
    } else if status.is_server_error() {
        Err(RemoteError::ServerUnreachable(format!("status {}", status.as_u16())))
    } else {
        Err(RemoteError::RequestRejected {
            status: status.as_u16(),
        })
    }
}

/// Parses a create response: an entity body is the confirmed record, an
/// empty body means the server did not echo it.
pub(crate) fn parse_created(body: &str) -> Option<Movie> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

impl Remote for HttpRemote {
    fn health(&self) -> RemoteFuture<'_, ()> {
        Box::pin(async move {
            let request = self
                .client
                .head(self.url("/api/health"))
                .header(reqwest::header::CACHE_CONTROL, "no-cache");
            self.send(request).await?;
            Ok(())
        })
    }

    fn list_page(&self, request: PageRequest) -> RemoteFuture<'_, PageResponse> {
        Box::pin(async move {
            let path = HttpRemote::list_path(request.mode());
            debug!(mode = %request.mode(), page = request.page, size = request.size, "list page");
            let builder = self.client.get(self.url(path)).query(&request.params());
            let response = self.send(builder).await?;
            let text = response.text().await.map_err(classify_transport)?;
            let parsed: ListResponse =
                serde_json::from_str(&text).map_err(|e| RemoteError::Decode(e.to_string()))?;
            Ok(parsed.into_parts())
        })
    }

    fn fetch_one(&self, id: i64) -> RemoteFuture<'_, Movie> {
        Box::pin(async move {
            let response = self
                .send(self.client.get(self.url(&format!("/api/movie/{}", id))))
                .await?;
            response
                .json::<Movie>()
                .await
                .map_err(|e| RemoteError::Decode(e.to_string()))
        })
    }

    fn create(&self, movie: Movie) -> RemoteFuture<'_, Option<Movie>> {
        Box::pin(async move {
            let builder = self.client.post(self.url("/api/add")).json(&movie.body());
            let response = self.send(builder).await?;
            let text = response.text().await.map_err(classify_transport)?;
            Ok(parse_created(&text))
        })
    }

    fn update(&self, id: i64, movie: Movie) -> RemoteFuture<'_, ()> {
        Box::pin(async move {
            let builder = self
                .client
                .put(self.url(&format!("/api/update/{}", id)))
                .json(&movie);
            self.send(builder).await?;
            Ok(())
        })
    }

    fn delete(&self, id: i64) -> RemoteFuture<'_, ()> {
        Box::pin(async move {
            self.send(self.client.delete(self.url(&format!("/api/delete/{}", id))))
                .await?;
            Ok(())
        })
    }
}
