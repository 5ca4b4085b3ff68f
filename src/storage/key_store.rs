//! `KeyStore` keeps the single active key pair as two PEM files in one directory.
//!
//! There is no versioning: saving a new pair overwrites the previous one, and
//! artifacts signed with the old private key no longer verify against the new
//! public key. Nothing here serializes regeneration against concurrent readers.
//!
//! 中文: 以两个 PEM 文件保存唯一的密钥对，重新生成时直接覆盖。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::common::config::SignerConfig;
use crate::error::{Error, Result};
use crate::keys::{KeyKind, KeyPair, PrivateKey, PublicKey};

/// 私钥文件权限 (-rw-------)
const PRIVATE_KEY_MODE: u32 = 0o600;

#[derive(Debug, Clone)]
pub struct KeyStore {
    dir: PathBuf,
    public_file: String,
    private_file: String,
}

impl KeyStore {
    /// Opens the store, creating `dir` if needed.
    pub fn open<P: AsRef<Path>>(
        dir: P,
        public_file: impl Into<String>,
        private_file: impl Into<String>,
    ) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("cannot create key directory {}: {}", dir.display(), e),
            ))
        })?;
        Ok(Self {
            dir,
            public_file: public_file.into(),
            private_file: private_file.into(),
        })
    }

    pub fn from_config(config: &SignerConfig) -> Result<Self> {
        Self::open(
            &config.key_dir,
            config.public_key_file.clone(),
            config.private_key_file.clone(),
        )
    }

    pub fn path(&self, kind: KeyKind) -> PathBuf {
        match kind {
            KeyKind::Public => self.dir.join(&self.public_file),
            KeyKind::Private => self.dir.join(&self.private_file),
        }
    }

    /// `true` only when both halves are present.
    pub fn exists(&self) -> bool {
        self.path(KeyKind::Public).is_file() && self.path(KeyKind::Private).is_file()
    }

    /// Writes both halves as PKCS#1 PEM, replacing any previous pair.
    pub fn save(&self, pair: &KeyPair) -> Result<()> {
        let (public_pem, private_pem) = pair.to_pem()?;
        let private_path = self.path(KeyKind::Private);
        let public_path = self.path(KeyKind::Public);

        super::write_atomic(&private_path, private_pem.as_bytes(), Some(PRIVATE_KEY_MODE))?;
        super::write_atomic(&public_path, public_pem.as_bytes(), None)?;

        info!(
            public = %public_path.display(),
            private = %private_path.display(),
            "saved key pair"
        );
        Ok(())
    }

    /// Raw PEM text of one half, e.g. for download.
    pub fn read_pem(&self, kind: KeyKind) -> Result<String> {
        match fs::read_to_string(self.path(kind)) {
            Ok(pem) => Ok(pem),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::KeyNotFound(kind)),
            Err(e) => Err(Error::Io(e)),
        }
    }

    pub fn load_public(&self) -> Result<PublicKey> {
        PublicKey::from_pem(&self.read_pem(KeyKind::Public)?)
    }

    pub fn load_private(&self) -> Result<PrivateKey> {
        let pem = zeroize::Zeroizing::new(self.read_pem(KeyKind::Private)?);
        PrivateKey::from_pem(&pem)
    }

    pub fn load_pair(&self) -> Result<KeyPair> {
        let public_pem = self.read_pem(KeyKind::Public)?;
        let private_pem = zeroize::Zeroizing::new(self.read_pem(KeyKind::Private)?);
        KeyPair::from_pem(&public_pem, &private_pem)
    }
}
