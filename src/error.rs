use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  // rejected before any extraction attempt
  #[error("{0}")]
  Input(&'static str),
  // yt-dlp could not retrieve the metadata
  #[error("{0}")]
  Extraction(String),
  #[error(transparent)]
  Unexpected(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<std::io::Error> for Error {
  fn from(err: std::io::Error) -> Self {
    Error::Unexpected(err.into())
  }
}

impl From<serde_json::Error> for Error {
  fn from(err: serde_json::Error) -> Self {
    Error::Unexpected(err.into())
  }
}

#[derive(Serialize)]
struct ErrorBody {
  error: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  details: Option<String>,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, body) = match self {
      Error::Input(message) => (
        StatusCode::BAD_REQUEST,
        ErrorBody {
          error: message,
          details: None,
        },
      ),
      Error::Extraction(details) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody {
          error: "Failed to extract video info",
          details: Some(details),
        },
      ),
      Error::Unexpected(err) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody {
          error: "An unexpected error occurred",
          details: Some(err.to_string()),
        },
      ),
    };

    (status, Json(body)).into_response()
  }
}
