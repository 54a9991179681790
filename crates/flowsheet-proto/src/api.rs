//! Station backend client.
//!
//! Thin JSON-over-HTTP wrapper around the library, rotation, bin and
//! flowsheet endpoints.  Every request carries the configured bearer token
//! when one is set.

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::{BackendConfig, SessionConfig};
use crate::records::{
    AlbumId, BinAddRequest, BinEntry, CatalogAlbum, FlowsheetEntry, RotationEntry, Submission,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid backend url {0:?}")]
    InvalidBaseUrl(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Which fields of a catalog search are filled.  Empty strings are left off
/// the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub n: u32,
}

impl CatalogQuery {
    pub fn new(artist_name: &str, album_name: &str, n: u32) -> Self {
        fn non_empty(s: &str) -> Option<String> {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Self {
            artist_name: non_empty(artist_name),
            album_name: non_empty(album_name),
            n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.artist_name.is_none() && self.album_name.is_none()
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(a) = &self.artist_name {
            pairs.push(("artist_name", a.clone()));
        }
        if let Some(a) = &self.album_name {
            pairs.push(("album_name", a.clone()));
        }
        pairs.push(("n", self.n.to_string()));
        pairs
    }
}

#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(backend: &BackendConfig, session: &SessionConfig) -> ApiResult<Self> {
        let http = Client::builder().timeout(backend.timeout()).build()?;
        Self::with_client(http, &backend.base_url, session.token.clone())
    }

    pub fn with_client(http: Client, base_url: &str, token: Option<String>) -> ApiResult<Self> {
        // Url::join drops the last path segment unless the base ends in '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base = Url::parse(&normalized)
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base, token })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base
            .join(path)
            .map_err(|_| ApiError::InvalidBaseUrl(format!("{}{}", self.base, path)))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ApiResult<T> {
        let url = self.url(path)?;
        debug!("GET {} {:?}", url, query);
        let response = self
            .authorize(self.http.get(url).query(query))
            .header("Accept", "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: response.status(),
            });
        }
        response
            .json()
            .await
            .map_err(|source| ApiError::Decode { endpoint, source })
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        req: RequestBuilder,
        body: Option<&B>,
    ) -> ApiResult<reqwest::Response> {
        let req = match body {
            Some(b) => req.json(b),
            None => req,
        };
        let response = self.authorize(req).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: response.status(),
            });
        }
        Ok(response)
    }

    /// Backend-filtered catalog search.
    pub async fn search_catalog(&self, query: &CatalogQuery) -> ApiResult<Vec<CatalogAlbum>> {
        self.get_json("library", "library", &query.pairs()).await
    }

    pub async fn fetch_rotation(&self) -> ApiResult<Vec<RotationEntry>> {
        self.get_json("rotation", "library/rotation", &[]).await
    }

    pub async fn fetch_bin(&self, dj_id: i64) -> ApiResult<Vec<BinEntry>> {
        self.get_json("bin", "djs/bin", &[("dj_id", dj_id.to_string())])
            .await
    }

    pub async fn add_to_bin(&self, dj_id: i64, album_id: AlbumId) -> ApiResult<()> {
        let url = self.url("djs/bin")?;
        debug!("POST {} album_id={}", url, album_id);
        let body = BinAddRequest { dj_id, album_id };
        self.send_json("bin", self.http.post(url), Some(&body))
            .await?;
        Ok(())
    }

    pub async fn remove_from_bin(&self, dj_id: i64, album_id: AlbumId) -> ApiResult<()> {
        let url = self.url("djs/bin")?;
        debug!("DELETE {} album_id={}", url, album_id);
        let req = self.http.delete(url).query(&[
            ("dj_id", dj_id.to_string()),
            ("album_id", album_id.to_string()),
        ]);
        self.send_json::<()>("bin", req, None).await?;
        Ok(())
    }

    /// Most recent plays, newest first.
    pub async fn fetch_flowsheet(&self, limit: u32) -> ApiResult<Vec<FlowsheetEntry>> {
        self.get_json("flowsheet", "flowsheet", &[("limit", limit.to_string())])
            .await
    }

    /// Log a submission as played now.  Returns the stored entry.
    pub async fn add_flowsheet_entry(&self, submission: &Submission) -> ApiResult<FlowsheetEntry> {
        let url = self.url("flowsheet")?;
        debug!("POST {} {:?}", url, submission.track_title);
        let response = self
            .send_json("flowsheet", self.http.post(url), Some(submission))
            .await?;
        response.json().await.map_err(|source| ApiError::Decode {
            endpoint: "flowsheet",
            source,
        })
    }
}
