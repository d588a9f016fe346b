use crate::{debug, types::ExplorerError};

use bytes::Bytes;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::{io::Read, time::Duration};

type FetchResult<T> = Result<T, ExplorerError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    Xz,
    Gzip,
    None,
}

impl Compression {
    /// Guess compression from the file name
    pub fn from_url(url: &str) -> Self {
        if url.ends_with(".xz") {
            Compression::Xz
        } else if url.ends_with(".gz") {
            Compression::Gzip
        } else {
            Compression::None
        }
    }

    pub fn decompress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut res = Vec::new();
        match self {
            Compression::Xz => {
                xz2::read::XzDecoder::new(data).read_to_end(&mut res)?;
            }
            Compression::Gzip => {
                flate2::read::GzDecoder::new(data).read_to_end(&mut res)?;
            }
            Compression::None => res.extend_from_slice(data),
        }
        Ok(res)
    }
}

/// Thin HTTP layer. Every failure comes back as `ExplorerError::FetchFailed`.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: u64, user_agent: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .user_agent(user_agent)
            .build()?;
        Ok(Fetcher { client })
    }

    pub async fn fetch_text(&self, url: &str) -> FetchResult<String> {
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ExplorerError::fetch(url, e))?;
        resp.text().await.map_err(|e| ExplorerError::fetch(url, e))
    }

    /// Download a file with a progress bar
    pub async fn fetch_binary(&self, url: &str) -> FetchResult<Bytes> {
        debug!("GET {}", url);
        let mut resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ExplorerError::fetch(url, e))?;

        let bar = ProgressBar::new(resp.content_length().unwrap_or(0));
        if let Ok(style) = ProgressStyle::default_bar().template(
            " {wide_msg} {total_bytes:>10} {binary_bytes_per_sec:>12} {eta:>4} {percent:>3}%",
        ) {
            bar.set_style(style);
        }
        let mut msg = url.rsplit('/').next().unwrap_or(url).to_owned();
        if console::measure_text_width(&msg) > 48 {
            msg = console::truncate_str(&msg, 45, "...").to_string();
        }
        bar.set_message(msg);

        let mut buf = Vec::new();
        while let Some(chunk) = resp.chunk().await.map_err(|e| ExplorerError::fetch(url, e))? {
            buf.extend_from_slice(&chunk);
            bar.inc(chunk.len() as u64);
        }
        bar.finish_and_clear();

        Ok(Bytes::from(buf))
    }

    /// Download and decompress according to the file extension
    pub async fn fetch_decompressed(&self, url: &str) -> FetchResult<(Bytes, String)> {
        let raw = self.fetch_binary(url).await?;
        let data = Compression::from_url(url)
            .decompress(&raw)
            .map_err(|e| ExplorerError::fetch(url, format!("decompression failed: {}", e)))?;
        let text =
            String::from_utf8(data).map_err(|e| ExplorerError::fetch(url, format!("bad encoding: {}", e)))?;
        Ok((raw, text))
    }
}
