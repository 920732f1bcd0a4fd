use std::{
  ffi::OsString,
  path::PathBuf,
  process::{Output, Stdio},
  sync::LazyLock,
  time::Duration,
};

use async_trait::async_trait;
use regex::Regex;
use tokio::{process::Command, sync::Semaphore};
use tracing::{debug, info, warn};

use crate::{config::Config, metadata::VideoMetadata, Error, Result};

use super::{CredentialSource, ExtractOptions, Extractor};

// run yt-dlp command line to dump the video info as json.
// requires yt-dlp executable to be in PATH unless YTDLP_PATH is set.
pub struct Ytdlp {
  program: PathBuf,
  proxy: Option<String>,
  timeout: Duration,
  // ensure only a limited set of ytdlp processes at a time
  permits: Semaphore,
}

impl Ytdlp {
  pub fn new(config: &Config) -> Self {
    if let Some(proxy) = &config.ytdlp_proxy {
      info!("using proxy: {}", redact_proxy(proxy));
    }

    Self {
      program: config.ytdlp_path.clone(),
      proxy: config.ytdlp_proxy.clone(),
      timeout: config.ytdlp_timeout,
      permits: Semaphore::new(config.ytdlp_concurrency),
    }
  }

  fn args(&self, url: &str, options: &ExtractOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
      // emit the output as a single json object instead of jsonl
      "--dump-single-json".into(),
      "--no-warnings".into(),
      "--no-progress".into(),
    ];

    if let Some(format) = &options.format {
      args.push("-f".into());
      args.push(format.into());
    }

    if options.no_playlist {
      args.push("--no-playlist".into());
    }

    if options.flat_playlist {
      // don't fetch video pages of playlist entries
      args.push("--flat-playlist".into());
    }

    match &options.credentials {
      Some(CredentialSource::Browser(browser)) => {
        args.push("--cookies-from-browser".into());
        args.push(browser.into());
      }
      Some(CredentialSource::File(path)) => {
        args.push("--cookies".into());
        args.push(path.into());
      }
      None => {}
    }

    if let Some(proxy) = &self.proxy {
      args.push("--proxy".into());
      args.push(proxy.into());
    }

    // the url must never be parsed as an option
    args.push("--".into());
    args.push(url.into());
    args
  }
}

#[async_trait]
impl Extractor for Ytdlp {
  async fn extract(
    &self,
    url: &str,
    options: &ExtractOptions,
  ) -> Result<VideoMetadata> {
    let mut cmd = Command::new(&self.program);
    cmd
      .args(self.args(url, options))
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true);

    let guard = self.permits.acquire().await.map_err(anyhow::Error::from)?;
    debug!("running yt-dlp for {}", url);
    let output = tokio::time::timeout(self.timeout, cmd.output()).await;
    drop(guard);

    let output = match output {
      Ok(output) => output?,
      Err(_) => {
        warn!("yt-dlp timed out for {}", url);
        return Err(Error::Extraction(format!(
          "yt-dlp timed out after {}s",
          self.timeout.as_secs()
        )));
      }
    };

    detect_error(&output)?;
    let meta: VideoMetadata = serde_json::from_slice(&output.stdout)?;

    Ok(meta)
  }
}

fn detect_error(output: &Output) -> Result<()> {
  let stderr = String::from_utf8_lossy(&output.stderr);
  let errors = stderr
    .lines()
    .filter(|line| line.contains("ERROR:"))
    .collect::<Vec<_>>();

  if !errors.is_empty() {
    return Err(Error::Extraction(errors.join("\n")));
  }

  if !output.status.success() {
    let stderr = stderr.trim();
    let details = if stderr.is_empty() {
      format!("yt-dlp exited with {}", output.status)
    } else {
      stderr.to_string()
    };
    return Err(Error::Extraction(details));
  }

  Ok(())
}

// used to remove cred info from proxy url before printing
fn redact_proxy(proxy: &str) -> std::borrow::Cow<'_, str> {
  static AUTH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^:/@]+(:[^@]+)?@").unwrap());
  AUTH_REGEX.replace(proxy, "//<REDACTED>@")
}
