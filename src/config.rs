use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{Context, Result};

pub const DEFAULT_FORMAT: &str = "bestaudio/best";

#[derive(Debug, Clone)]
pub struct Config {
  pub bind_addr: SocketAddr,
  pub ytdlp_path: PathBuf,
  // number of yt-dlp processes allowed at a time
  pub ytdlp_concurrency: usize,
  pub ytdlp_timeout: Duration,
  pub ytdlp_proxy: Option<String>,
  pub default_format: String,
  pub cookies_browser: Option<String>,
  pub cookies_dir: Option<PathBuf>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
      ytdlp_path: PathBuf::from("yt-dlp"),
      ytdlp_concurrency: 1,
      ytdlp_timeout: Duration::from_secs(60),
      ytdlp_proxy: None,
      default_format: DEFAULT_FORMAT.to_string(),
      cookies_browser: None,
      cookies_dir: None,
    }
  }
}

impl Config {
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    // empty values count as unset
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut config = Config::default();

    if let Some(addr) = var("BIND_ADDR") {
      config.bind_addr = addr
        .parse()
        .with_context(|| format!("invalid BIND_ADDR: {addr}"))?;
    }

    if let Some(path) = var("YTDLP_PATH") {
      config.ytdlp_path = PathBuf::from(path);
    }

    if let Some(n) = var("YTDLP_CONCURRENCY") {
      config.ytdlp_concurrency = n
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .with_context(|| format!("invalid YTDLP_CONCURRENCY: {n}"))?;
    }

    if let Some(secs) = var("YTDLP_TIMEOUT_SECS") {
      let secs: u64 = secs
        .parse()
        .with_context(|| format!("invalid YTDLP_TIMEOUT_SECS: {secs}"))?;
      config.ytdlp_timeout = Duration::from_secs(secs);
    }

    if let Some(format) = var("YTDLP_FORMAT") {
      config.default_format = format;
    }

    config.ytdlp_proxy = var("YTDLP_PROXY");
    config.cookies_browser = var("YTDLP_COOKIES_BROWSER");
    config.cookies_dir = var("COOKIES_TEMP_DIR").map(PathBuf::from);

    Ok(config)
  }
}
