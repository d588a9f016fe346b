mod release;
pub use release::ReleaseFile;

use crate::{
    debug,
    types::{config::Config, parse_package_index, ExplorerError, PackageRecord},
    utils::downloader::Fetcher,
};

use anyhow::{format_err, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Names tried, in order, when looking for the metadata of a suite
const RELEASE_FILES: &[&str] = &["InRelease", "Release"];
/// Package indices tried, in order, for a component/architecture pair
const PACKAGES_FILES: &[&str] = &["Packages.xz", "Packages.gz", "Packages"];

/// Walks a repository over HTTP, starting from a base URL
pub struct Discovery {
    base_url: String,
    fetcher: Fetcher,
}

impl Discovery {
    pub fn new(base_url: &str, config: &Config) -> Result<Self> {
        Ok(Discovery {
            base_url: base_url.to_owned(),
            fetcher: Fetcher::new(config.timeout, &config.user_agent)?,
        })
    }

    /// List a directory index page as served by Apache or nginx
    pub async fn list_directory(&self, url: &str) -> Result<Vec<DirEntry>> {
        let content = self
            .fetcher
            .fetch_text(url)
            .await
            .context(format!("Failed to list directory {}", url))?;
        Ok(parse_listing(&content))
    }

    /// URL of `path` below the base URL, every component treated as a directory
    pub fn navigate<S: AsRef<str>>(&self, path: &[S]) -> Result<String> {
        join_dirs(&self.base_url, path)
    }

    /// Look for a Release or InRelease file in a directory listing
    pub async fn find_release_file(&self, url: &str) -> Result<Option<String>> {
        let items = self.list_directory(url).await?;
        for name in RELEASE_FILES {
            if items
                .iter()
                .any(|item| item.kind == EntryKind::File && item.name == *name)
            {
                return Ok(Some(join_file(url, name)?));
            }
        }

        Ok(None)
    }

    pub async fn get_release(&self, release_url: &str) -> Result<ReleaseFile> {
        let content = self.fetcher.fetch_text(release_url).await?;
        ReleaseFile::parse(&content).context(format!("Failed to parse {}", release_url))
    }

    /// Fetch the metadata of a suite without relying on directory listings.
    /// Returns the URL that worked along with the parsed file.
    pub async fn fetch_release(&self, suite_url: &str) -> Result<(String, ReleaseFile)> {
        let mut last_error = None;
        for name in RELEASE_FILES {
            let url = join_file(suite_url, name)?;
            match self.fetcher.fetch_text(&url).await {
                Ok(content) => {
                    let release = ReleaseFile::parse(&content)
                        .context(format!("Failed to parse {}", url))?;
                    return Ok((url, release));
                }
                Err(e) => {
                    debug!("{}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .map(anyhow::Error::from)
            .unwrap_or_else(|| format_err!("No Release file found in {}", suite_url)))
    }

    /// Download and parse the package index of one component and architecture.
    ///
    /// Compressed indices are preferred. If `release` lists the downloaded
    /// file, its size and checksum are verified.
    pub async fn load_packages(
        &self,
        suite: &str,
        component: &str,
        arch: &str,
        release: Option<&ReleaseFile>,
    ) -> Result<Vec<PackageRecord>> {
        let suite_url = self.navigate(&["dists", suite])?;
        let mut last_error = None;
        for name in PACKAGES_FILES {
            let rel_path = format!("{}/binary-{}/{}", component, arch, name);
            let url = join_file(&suite_url, &rel_path)?;
            let (raw, text) = match self.fetcher.fetch_decompressed(&url).await {
                Ok(res) => res,
                Err(e) => {
                    debug!("{}", e);
                    last_error = Some(e);
                    continue;
                }
            };

            if let Some((size, chksum)) = release.and_then(|r| r.checksum_for(&rel_path)) {
                if raw.len() as u64 != *size || !chksum.cmp_bytes(&raw) {
                    return Err(ExplorerError::ChecksumMismatch { url }.into());
                }
                debug!("Checksum of {} verified", url);
            }

            return Ok(parse_package_index(&text));
        }

        let e = last_error.unwrap_or_else(|| ExplorerError::fetch(&suite_url, "no package index"));
        Err(anyhow::Error::from(e).context(format!(
            "Failed to fetch package index for {}/{} ({})",
            suite, component, arch
        )))
    }
}

/// Extract entries from an HTML directory index
pub fn parse_listing(content: &str) -> Vec<DirEntry> {
    lazy_static! {
        static ref LINK: Regex = Regex::new(r#"(?i)<a href="([^"]+)"[^>]*>([^<]+)</a>"#).unwrap();
    }

    let mut res = Vec::new();
    for captures in LINK.captures_iter(content) {
        let href = &captures[1];
        // Parent directory, absolute links and column sort links
        if matches!(href, "../" | ".." | "/") || href.starts_with('?') {
            continue;
        }
        if is_absolute(href) {
            continue;
        }

        let kind = if href.ends_with('/') {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        let name = href.trim_end_matches('/');
        if !name.is_empty() {
            res.push(DirEntry {
                name: name.to_owned(),
                kind,
            });
        }
    }

    res
}

// `scheme://...` or protocol relative `//host/...`
fn is_absolute(href: &str) -> bool {
    if href.starts_with("//") {
        return true;
    }
    match href.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

fn join_dirs<S: AsRef<str>>(base: &str, path: &[S]) -> Result<String> {
    let mut url = Url::parse(&with_trailing_slash(base))?;
    for component in path {
        url = url.join(&format!("{}/", component.as_ref().trim_matches('/')))?;
    }
    Ok(url.to_string())
}

fn join_file(dir: &str, name: &str) -> Result<String> {
    let url = Url::parse(&with_trailing_slash(dir))?.join(name)?;
    Ok(url.to_string())
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_owned()
    } else {
        format!("{}/", url)
    }
}
