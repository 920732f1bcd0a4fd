use serde::Serialize;
use serde_json::{Number, Value};

use crate::metadata::{has_codec, has_url, VideoMetadata};

/// The flattened response returned to API callers. Absent fields are
/// serialized as `null`; passthrough fields keep yt-dlp's json as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimplifiedResult {
  pub id: Option<Value>,
  pub title: Option<Value>,
  pub thumbnail: Option<Value>,
  pub duration: Option<Value>,
  pub uploader: Option<Value>,
  pub channel_url: Option<Value>,
  pub view_count: Option<Value>,
  pub audio_url: Option<String>,
  // only set when audio_url came from the format list
  pub format_id: Option<String>,
  pub ext: Option<String>,
  #[serde(rename = "abr")]
  pub average_audio_bitrate: Option<Number>,
}

/// Picks a direct audio stream URL out of yt-dlp's metadata.
///
/// The top-level stream wins when it carries an audio codec and a URL.
/// Otherwise the format list is scanned from the end, since yt-dlp sorts it
/// by ascending quality, and the first audio-only entry with a URL is used.
/// Finding nothing is not an error; `audio_url` is simply left empty.
pub fn select(meta: &VideoMetadata) -> SimplifiedResult {
  let mut result = SimplifiedResult {
    id: meta.id.clone(),
    title: meta.title.clone(),
    thumbnail: meta.thumbnail.clone(),
    duration: meta.duration.clone(),
    uploader: meta.uploader.clone(),
    channel_url: meta.channel_url.clone(),
    view_count: meta.view_count.clone(),
    ..Default::default()
  };

  // NOTE: the top level only checks the audio codec, unlike the format
  // list below which also requires vcodec == "none". Kept as is.
  if has_codec(meta.audio_codec.as_deref()) && has_url(meta.url.as_deref()) {
    result.audio_url = meta.url.clone();
    return result;
  }

  if let Some(format) = meta.formats.iter().rev().find(|f| f.is_audio_only())
  {
    result.audio_url = format.url.clone();
    result.format_id = format.format_id.clone();
    result.ext = format.ext.clone();
    result.average_audio_bitrate = format.average_audio_bitrate.clone();
  }

  result
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::metadata::FormatCandidate;

  fn format(
    id: &str,
    acodec: &str,
    vcodec: &str,
    url: Option<&str>,
  ) -> FormatCandidate {
    FormatCandidate {
      format_id: Some(id.into()),
      audio_codec: Some(acodec.into()),
      video_codec: Some(vcodec.into()),
      ext: Some("m4a".into()),
      average_audio_bitrate: Number::from_f64(128.0),
      url: url.map(Into::into),
      ..Default::default()
    }
  }

  fn metadata(formats: Vec<FormatCandidate>) -> VideoMetadata {
    VideoMetadata {
      id: Some(json!("abc")),
      title: Some(json!("Some title")),
      duration: Some(json!(61.5)),
      view_count: Some(json!(42)),
      audio_codec: Some("none".into()),
      video_codec: Some("avc1".into()),
      url: Some("https://example.com/muxed".into()),
      formats,
      ..Default::default()
    }
  }

  #[test]
  fn test_top_level_takes_precedence() {
    let mut meta = metadata(vec![format("140", "mp4a", "none", Some("u1"))]);
    meta.audio_codec = Some("opus".into());
    meta.url = Some("https://example.com/top".into());

    let result = select(&meta);
    assert_eq!(result.audio_url.as_deref(), Some("https://example.com/top"));
    assert_eq!(result.format_id, None);
    assert_eq!(result.ext, None);
    assert_eq!(result.average_audio_bitrate, None);
  }

  #[test]
  fn test_top_level_ignores_video_codec() {
    let mut meta = metadata(vec![]);
    meta.audio_codec = Some("mp4a".into());
    meta.video_codec = Some("avc1".into());

    let result = select(&meta);
    assert_eq!(
      result.audio_url.as_deref(),
      Some("https://example.com/muxed")
    );
  }

  #[test]
  fn test_top_level_without_url_falls_through() {
    let mut meta = metadata(vec![format("140", "mp4a", "none", Some("u1"))]);
    meta.audio_codec = Some("mp4a".into());
    meta.url = None;

    let result = select(&meta);
    assert_eq!(result.audio_url.as_deref(), Some("u1"));
    assert_eq!(result.format_id.as_deref(), Some("140"));
  }

  #[test]
  fn test_top_level_empty_url_falls_through() {
    let mut meta = metadata(vec![format("251", "opus", "none", Some("u251"))]);
    meta.audio_codec = Some("opus".into());
    meta.url = Some(String::new());

    let result = select(&meta);
    assert_eq!(result.audio_url.as_deref(), Some("u251"));
    assert_eq!(result.format_id.as_deref(), Some("251"));
  }

  #[test]
  fn test_top_level_without_audio_codec_is_ineligible() {
    let mut meta = metadata(vec![format("140", "mp4a", "none", Some("u140"))]);
    meta.audio_codec = None;
    meta.url = Some("https://example.com/top".into());

    let result = select(&meta);
    assert_eq!(result.audio_url.as_deref(), Some("u140"));
    assert_eq!(result.format_id.as_deref(), Some("140"));

    meta.formats.clear();
    assert_eq!(select(&meta).audio_url, None);
  }

  #[test]
  fn test_last_eligible_format_wins() {
    let meta = metadata(vec![
      format("a", "mp4a", "none", Some("u1")),
      format("b", "mp4a", "avc1", Some("u2")),
      format("c", "opus", "none", Some("u3")),
    ]);

    let result = select(&meta);
    assert_eq!(result.audio_url.as_deref(), Some("u3"));
    assert_eq!(result.format_id.as_deref(), Some("c"));
    assert_eq!(result.ext.as_deref(), Some("m4a"));
    assert_eq!(result.average_audio_bitrate, Number::from_f64(128.0));
  }

  #[test]
  fn test_muxed_format_never_selected() {
    let meta = metadata(vec![
      format("a", "mp4a", "none", Some("u1")),
      format("b", "mp4a", "avc1", Some("u2")),
    ]);
    assert_eq!(select(&meta).audio_url.as_deref(), Some("u1"));

    let mut missing_vcodec = format("c", "mp4a", "none", Some("u3"));
    missing_vcodec.video_codec = None;
    let meta = metadata(vec![missing_vcodec]);
    assert_eq!(select(&meta).audio_url, None);
  }

  #[test]
  fn test_empty_url_skipped() {
    let meta = metadata(vec![
      format("a", "mp4a", "none", Some("u1")),
      format("b", "opus", "none", None),
      format("c", "opus", "none", Some("")),
    ]);

    let result = select(&meta);
    assert_eq!(result.audio_url.as_deref(), Some("u1"));
    assert_eq!(result.format_id.as_deref(), Some("a"));
  }

  #[test]
  fn test_no_match() {
    let meta = metadata(vec![
      format("a", "none", "none", Some("u1")),
      format("b", "mp4a", "avc1", Some("u2")),
    ]);

    let result = select(&meta);
    assert_eq!(result.audio_url, None);
    assert_eq!(result.format_id, None);
    assert_eq!(result.ext, None);
    assert_eq!(result.average_audio_bitrate, None);
    assert_eq!(result.title, Some(json!("Some title")));
    assert_eq!(result.view_count, Some(json!(42)));
  }

  #[test]
  fn test_select_is_idempotent() {
    let meta = metadata(vec![format("a", "mp4a", "none", Some("u1"))]);
    assert_eq!(select(&meta), select(&meta));
  }

  #[test]
  fn test_absent_fields_serialize_as_null() {
    let value = serde_json::to_value(select(&metadata(vec![]))).unwrap();
    assert!(value["audio_url"].is_null());
    assert!(value["abr"].is_null());
    assert!(value["uploader"].is_null());
    assert_eq!(value["id"], "abc");
  }

  #[test]
  fn test_passthrough_keeps_json_types() {
    let meta: VideoMetadata = serde_json::from_value(json!({
      "duration": 212,
      "view_count": 1500.0,
      "formats": [
        {"format_id": "140", "acodec": "mp4a", "vcodec": "none",
         "abr": 128, "url": "u140"}
      ]
    }))
    .unwrap();

    let value = serde_json::to_value(select(&meta)).unwrap();
    assert_eq!(value["duration"], json!(212));
    assert!(value["duration"].is_u64());
    assert_eq!(value["view_count"], json!(1500.0));
    assert!(value["abr"].is_u64());
  }
}
