use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Failed to fetch {url}: {cause}")]
    FetchFailed { url: String, cause: String },
    #[error("Checksum mismatch for {url}. Mirror may be syncing, try again later.")]
    ChecksumMismatch { url: String },
}

impl ExplorerError {
    pub fn fetch(url: &str, cause: impl ToString) -> Self {
        ExplorerError::FetchFailed {
            url: url.to_owned(),
            cause: cause.to_string(),
        }
    }
}
