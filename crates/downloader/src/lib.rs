mod errors;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub use errors::{DownloaderError, Result};
use reqwest::{Client, header};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// a single file to fetch over one connection.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub output: PathBuf,
    pub referer: Option<String>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            output: output.into(),
            referer: None,
        }
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadEvent {
    Started {
        total_bytes: Option<u64>,
    },
    Progress {
        downloaded_bytes: u64,
        total_bytes: Option<u64>,
        elapsed: Duration,
    },
    Finished {
        downloaded_bytes: u64,
        elapsed: Duration,
    },
}

/// streams `request.url` into `request.output`, reporting progress through `on_event`.
///
/// the body is written chunk by chunk as it arrives. a response without a
/// `Content-Length` is still downloaded; its events just carry no total.
/// returns the number of bytes written.
pub async fn download<F>(client: &Client, request: DownloadRequest, mut on_event: F) -> Result<u64>
where
    F: FnMut(DownloadEvent),
{
    let mut builder = client.get(&request.url);
    if let Some(referer) = &request.referer {
        builder = builder.header(header::REFERER, referer);
    }

    let mut response = builder
        .send()
        .await
        .map_err(|source| DownloaderError::Request {
            context: "sending GET request".to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(DownloaderError::HttpStatus {
            context: "downloading file".to_string(),
            status: response.status(),
        });
    }

    let total_bytes = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    debug!(url = %request.url, ?total_bytes, "download started");

    let output = request.output.as_path();
    ensure_parent_dir(output).await?;
    let mut file = File::create(output)
        .await
        .map_err(|source| DownloaderError::Io {
            context: format!("creating output file {}", output.display()),
            source,
        })?;

    let started = Instant::now();
    let mut downloaded_bytes = 0u64;
    on_event(DownloadEvent::Started { total_bytes });

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|source| DownloaderError::Request {
            context: "reading response body".to_string(),
            source,
        })?
    {
        file.write_all(&chunk)
            .await
            .map_err(|source| DownloaderError::Io {
                context: format!("writing output file {}", output.display()),
                source,
            })?;

        downloaded_bytes += chunk.len() as u64;
        on_event(DownloadEvent::Progress {
            downloaded_bytes,
            total_bytes,
            elapsed: started.elapsed(),
        });
    }

    file.flush().await.map_err(|source| DownloaderError::Io {
        context: format!("flushing output file {}", output.display()),
        source,
    })?;

    on_event(DownloadEvent::Finished {
        downloaded_bytes,
        elapsed: started.elapsed(),
    });
    debug!(url = %request.url, downloaded_bytes, "download finished");

    Ok(downloaded_bytes)
}

async fn ensure_parent_dir(output: &Path) -> Result<()> {
    let Some(parent) = output.parent() else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| DownloaderError::Io {
            context: format!("creating output directory {}", parent.display()),
            source,
        })
}
