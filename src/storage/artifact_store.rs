//! `ArtifactStore` 将签名文件写入目录，文件名带毫秒时间戳。

use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::artifact::SignedArtifact;
use crate::common::config::SignerConfig;
use crate::error::Result;

const FILE_PREFIX: &str = "mensaje_firmado_";
const FILE_EXTENSION: &str = "txt";

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn from_config(config: &SignerConfig) -> Result<Self> {
        Self::open(&config.artifact_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the rendered artifact to `mensaje_firmado_<unix-millis>.txt` and returns
    /// its path. Existing files are never overwritten; a `_<n>` suffix is added instead.
    /// A file whose write fails is removed again.
    pub fn save(&self, artifact: &SignedArtifact) -> Result<PathBuf> {
        let stamp = Utc::now().timestamp_millis();
        let rendered = artifact.render();

        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("{FILE_PREFIX}{stamp}.{FILE_EXTENSION}")
            } else {
                format!("{FILE_PREFIX}{stamp}_{attempt}.{FILE_EXTENSION}")
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    super::write_or_discard(file, &path, rendered.as_bytes())?;
                    info!(path = %path.display(), "saved signed artifact");
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Reads an artifact document back as text.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }
}
