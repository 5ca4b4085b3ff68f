//! `SigningService` exposes the three logical operations (generate, sign, verify)
//! on top of the stores, the way a transport layer would call them.
//!
//! 中文: 面向调用层的服务门面：生成密钥、签名、校验。不提供任何锁。

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::PathBuf;
use tracing::instrument;

use crate::artifact::SignedArtifact;
use crate::common::config::SignerConfig;
use crate::common::hash::HashAlgorithm;
use crate::error::Result;
use crate::keys::{KeyKind, KeyPair, KeyPairGenerator};
use crate::signer::Signer;
use crate::storage::{ArtifactStore, KeyStore};
use crate::verifier::{Verdict, Verifier};

/// Everything a caller needs to report after signing.
#[derive(Debug, Clone)]
pub struct SignOutcome {
    pub message: String,
    pub signature_base64: String,
    pub hash: HashAlgorithm,
    /// Rendered artifact document.
    pub artifact: String,
    /// Where the artifact was written.
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SigningService {
    config: SignerConfig,
    keys: KeyStore,
    artifacts: ArtifactStore,
}

impl SigningService {
    pub fn new(config: SignerConfig) -> Result<Self> {
        let keys = KeyStore::from_config(&config)?;
        let artifacts = ArtifactStore::from_config(&config)?;
        Ok(Self {
            config,
            keys,
            artifacts,
        })
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    pub fn key_store(&self) -> &KeyStore {
        &self.keys
    }

    pub fn artifact_store(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Generates a fresh pair and overwrites the stored one.
    #[instrument(skip(self))]
    pub fn generate_key_pair(&self) -> Result<KeyPair> {
        let pair = KeyPairGenerator::new().generate()?;
        self.keys.save(&pair)?;
        Ok(pair)
    }

    /// PEM text of one stored key.
    pub fn export_key(&self, kind: KeyKind) -> Result<String> {
        self.keys.read_pem(kind)
    }

    /// Signs with the stored private key and persists the artifact.
    ///
    /// Fails with `KeyNotFound(Private)` until a pair has been generated.
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    pub fn sign(&self, message: &str, hash: Option<HashAlgorithm>) -> Result<SignOutcome> {
        let hash = hash.unwrap_or(self.config.default_hash);
        let signer = Signer::new(self.keys.load_private()?);
        let signature = signer.sign(message, hash)?;
        let artifact = SignedArtifact::new(message, STANDARD.encode(&signature));
        let path = self.artifacts.save(&artifact)?;

        Ok(SignOutcome {
            message: message.to_string(),
            signature_base64: artifact.signature_base64().to_string(),
            hash,
            artifact: artifact.render(),
            path,
        })
    }

    /// Verifies an uploaded artifact against an uploaded public key.
    /// The stored key pair is not consulted.
    #[instrument(skip_all)]
    pub fn verify(
        &self,
        artifact_text: &str,
        public_key_pem: &str,
        hash: Option<HashAlgorithm>,
    ) -> Result<Verdict> {
        let hash = hash.unwrap_or(self.config.default_hash);
        Verifier::from_pem(public_key_pem)?.verify(artifact_text, hash)
    }
}
