mod ytdlp;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::{metadata::VideoMetadata, Result};

pub use ytdlp::Ytdlp;

/// Where yt-dlp should read cookies from.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
  // a browser profile on this machine, e.g. "chrome"
  Browser(String),
  // a cookies.txt file
  File(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractOptions {
  pub format: Option<String>,
  pub no_playlist: bool,
  pub flat_playlist: bool,
  pub credentials: Option<CredentialSource>,
}

#[async_trait]
pub trait Extractor: Send + Sync {
  /// Fetches metadata for `url` without downloading anything.
  ///
  /// Fails with `Error::Extraction` when the tool itself reports that the
  /// video could not be retrieved.
  async fn extract(
    &self,
    url: &str,
    options: &ExtractOptions,
  ) -> Result<VideoMetadata>;
}
