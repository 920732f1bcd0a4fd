use std::{
  io::Write,
  path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::Result;

/// A caller-supplied cookies.txt written to disk for a single yt-dlp run.
///
/// Every instance gets its own file name. The file is deleted when the
/// value is dropped, whichever way the request ends.
pub struct CredentialFile {
  file: NamedTempFile,
}

impl CredentialFile {
  pub fn write(dir: Option<&Path>, contents: &str) -> Result<Self> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("cookies-").suffix(".txt");
    let mut file = match dir {
      Some(dir) => builder.tempfile_in(dir)?,
      None => builder.tempfile()?,
    };

    file.write_all(contents.as_bytes())?;
    file.flush()?;
    debug!("wrote transient cookie file {}", file.path().display());

    Ok(Self { file })
  }

  pub fn path(&self) -> &Path {
    self.file.path()
  }

  pub fn to_path_buf(&self) -> PathBuf {
    self.path().to_path_buf()
  }
}
