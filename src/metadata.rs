use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// The subset of yt-dlp's info dict this service reads.
///
/// Passthrough fields are kept as raw json so whatever type an extractor
/// reports reaches the caller unchanged. `formats` is expected in yt-dlp's
/// own order, from lowest to highest quality. Nothing here checks that.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VideoMetadata {
  pub id: Option<Value>,
  pub title: Option<Value>,
  pub thumbnail: Option<Value>,
  pub duration: Option<Value>,
  pub uploader: Option<Value>,
  pub channel_url: Option<Value>,
  pub view_count: Option<Value>,
  #[serde(rename = "acodec", default, deserialize_with = "lenient")]
  pub audio_codec: Option<String>,
  #[serde(rename = "vcodec", default, deserialize_with = "lenient")]
  pub video_codec: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub url: Option<String>,
  #[serde(default)]
  pub formats: Vec<FormatCandidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatCandidate {
  #[serde(default, deserialize_with = "lenient")]
  pub format_id: Option<String>,
  #[serde(rename = "acodec", default, deserialize_with = "lenient")]
  pub audio_codec: Option<String>,
  #[serde(rename = "vcodec", default, deserialize_with = "lenient")]
  pub video_codec: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub ext: Option<String>,
  #[serde(rename = "abr", default, deserialize_with = "lenient")]
  pub average_audio_bitrate: Option<Number>,
  #[serde(default, deserialize_with = "lenient")]
  pub url: Option<String>,
  // everything else yt-dlp reports, kept for /formats
  #[serde(flatten)]
  pub rest: Map<String, Value>,
}

// a value of an unexpected type is treated as missing
fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Option::<Value>::deserialize(de)?;
  Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

// yt-dlp writes the literal "none" for a missing stream
pub(crate) fn has_codec(codec: Option<&str>) -> bool {
  matches!(codec, Some(c) if c != "none")
}

pub(crate) fn has_url(url: Option<&str>) -> bool {
  url.is_some_and(|url| !url.is_empty())
}

impl FormatCandidate {
  pub fn is_audio_only(&self) -> bool {
    has_codec(self.audio_codec.as_deref())
      && self.video_codec.as_deref() == Some("none")
      && has_url(self.url.as_deref())
  }
}
