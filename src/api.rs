use std::sync::Arc;

use axum::{
  extract::{Query, State},
  response::IntoResponse,
  routing::{get, post},
  Json, Router,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
  config::Config,
  credentials::CredentialFile,
  extractor::{CredentialSource, ExtractOptions, Extractor, Ytdlp},
  metadata::{FormatCandidate, VideoMetadata},
  selector::{select, SimplifiedResult},
  Error, Result,
};

const MISSING_URL: &str = "Missing URL parameter";
const MISSING_URL_OR_COOKIES: &str = "Missing URL or cookies";

#[derive(Clone)]
pub struct AppState {
  pub extractor: Arc<dyn Extractor>,
  pub config: Arc<Config>,
}

impl AppState {
  pub fn new(config: Config) -> Self {
    Self {
      extractor: Arc::new(Ytdlp::new(&config)),
      config: Arc::new(config),
    }
  }

  fn browser_cookies(&self) -> Option<CredentialSource> {
    self
      .config
      .cookies_browser
      .clone()
      .map(CredentialSource::Browser)
  }

  fn format_or_default(&self, format: Option<String>) -> String {
    non_empty(format).unwrap_or_else(|| self.config.default_format.clone())
  }

  async fn extract(
    &self,
    url: &str,
    options: &ExtractOptions,
  ) -> Result<VideoMetadata> {
    info!("extracting info for {}", url);
    self.extractor.extract(url, options).await.inspect_err(|e| match e {
      Error::Extraction(details) => {
        warn!("yt-dlp failed for {}: {}", url, details)
      }
      Error::Unexpected(err) => error!("error extracting {}: {:#}", url, err),
      Error::Input(_) => {}
    })
  }
}

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/extract-info", get(extract_info))
    .route("/extract-info-secure", post(extract_info_secure))
    .route("/formats", get(formats))
    .with_state(state)
}

async fn health() -> impl IntoResponse {
  "ok".to_owned()
}

#[derive(Deserialize)]
struct UrlQuery {
  url: Option<String>,
  format: Option<String>,
}

#[derive(Deserialize)]
struct SecureRequest {
  url: Option<String>,
  // contents of a cookies.txt file
  cookies: Option<String>,
  format: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
  s.filter(|s| !s.trim().is_empty())
}

async fn extract_info(
  State(state): State<AppState>,
  Query(query): Query<UrlQuery>,
) -> Result<Json<SimplifiedResult>> {
  let url = non_empty(query.url).ok_or(Error::Input(MISSING_URL))?;
  let options = ExtractOptions {
    format: Some(state.format_or_default(query.format)),
    no_playlist: true,
    flat_playlist: true,
    credentials: state.browser_cookies(),
  };

  let meta = state.extract(&url, &options).await?;
  Ok(Json(select(&meta)))
}

async fn extract_info_secure(
  State(state): State<AppState>,
  body: Option<Json<SecureRequest>>,
) -> Result<Json<SimplifiedResult>> {
  let Some(Json(req)) = body else {
    return Err(Error::Input(MISSING_URL_OR_COOKIES));
  };
  let (Some(url), Some(cookies)) = (non_empty(req.url), non_empty(req.cookies))
  else {
    return Err(Error::Input(MISSING_URL_OR_COOKIES));
  };

  // removed when dropped at the end of this function on every path
  let cookie_file =
    CredentialFile::write(state.config.cookies_dir.as_deref(), &cookies)?;
  let options = ExtractOptions {
    format: Some(state.format_or_default(req.format)),
    no_playlist: true,
    flat_playlist: false,
    credentials: Some(CredentialSource::File(cookie_file.to_path_buf())),
  };

  let meta = state.extract(&url, &options).await;
  drop(cookie_file);

  Ok(Json(select(&meta?)))
}

async fn formats(
  State(state): State<AppState>,
  Query(query): Query<UrlQuery>,
) -> Result<Json<Vec<FormatCandidate>>> {
  let url = non_empty(query.url).ok_or(Error::Input(MISSING_URL))?;
  let options = ExtractOptions {
    no_playlist: true,
    credentials: state.browser_cookies(),
    ..Default::default()
  };

  let meta = state.extract(&url, &options).await?;
  Ok(Json(meta.formats))
}
