//! Remote archive host: existence probe and pass-through fetch.

use async_trait::async_trait;
use axum::body::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::Url;

use pvm_common::config::FileHostConfig;
use pvm_common::{AppError, AppResult};

pub type ByteStream = BoxStream<'static, Result<Bytes, std::io::Error>>;

/// Body of a remote archive, relayed chunk by chunk.
pub struct RemoteFile {
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

#[async_trait]
pub trait FileHost: Send + Sync {
    /// Status code the host answers with for `url`, without fetching the body.
    async fn probe(&self, url: &Url) -> AppResult<u16>;
    /// Start streaming the archive at `url`.
    async fn fetch(&self, url: &Url) -> AppResult<RemoteFile>;
}

/// Location of a release archive:
/// `{base_url}/{file_name}/{archive_prefix}{version}.zip`.
///
/// Each part is pushed as a single path segment, so separators inside the
/// file name or version are percent-encoded rather than changing the path.
pub fn archive_url(config: &FileHostConfig, file_name: &str, version: &str) -> AppResult<Url> {
    let mut url = Url::parse(&config.base_url).map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "Invalid file host base URL '{}': {}",
            config.base_url,
            e
        ))
    })?;

    url.path_segments_mut()
        .map_err(|_| {
            AppError::Internal(anyhow::anyhow!(
                "File host base URL '{}' cannot carry a path",
                config.base_url
            ))
        })?
        .pop_if_empty()
        .push(file_name)
        .push(&format!("{}{}.zip", config.archive_prefix, version));

    Ok(url)
}

/// `FileHost` over HTTP(S).
pub struct HttpFileHost {
    client: reqwest::Client,
}

impl HttpFileHost {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pvm-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FileHost for HttpFileHost {
    async fn probe(&self, url: &Url) -> AppResult<u16> {
        let resp = self.client.head(url.clone()).send().await.map_err(|e| {
            tracing::warn!(%url, "Archive probe failed: {}", e);
            AppError::Upstream("File not available!".into())
        })?;
        Ok(resp.status().as_u16())
    }

    async fn fetch(&self, url: &Url) -> AppResult<RemoteFile> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!(%url, "Archive fetch failed: {}", e);
                AppError::Upstream("File not available!".into())
            })?;

        let content_length = resp.content_length();
        let body = resp.bytes_stream().map(|chunk| chunk.map_err(std::io::Error::other));

        Ok(RemoteFile {
            content_length,
            body: body.boxed(),
        })
    }
}
