//! `Signer` 使用 RSA PKCS#1 v1.5 对消息签名。
//!
//! The message is signed as its raw UTF-8 bytes with no normalization; trailing
//! whitespace is significant. PKCS#1 v1.5 is deterministic, so signing the same
//! message twice with the same key yields the same bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::artifact::SignedArtifact;
use crate::common::hash::HashAlgorithm;
use crate::error::{Error, Result};
use crate::keys::PrivateKey;

/// Signs messages with one private key.
#[derive(Debug, Clone)]
pub struct Signer {
    private_key: PrivateKey,
}

impl Signer {
    pub fn new(private_key: PrivateKey) -> Self {
        Self { private_key }
    }

    /// Builds a signer from PEM text; fails with [`Error::KeyFormat`].
    pub fn from_pem(private_key_pem: &str) -> Result<Self> {
        Ok(Self::new(PrivateKey::from_pem(private_key_pem)?))
    }

    /// Returns the raw signature bytes over `hash(message)`.
    pub fn sign(&self, message: &str, hash: HashAlgorithm) -> Result<Vec<u8>> {
        let digest = hash.digest(message.as_bytes());
        let signature = self
            .private_key
            .as_rsa()
            .sign(hash.padding(), &digest)
            .map_err(|e| Error::KeyFormat(format!("RSA signing failed: {e}")))?;
        debug!(
            %hash,
            message_len = message.len(),
            signature_len = signature.len(),
            "signed message"
        );
        Ok(signature)
    }

    /// Signs `message` and binds it with the base64 signature into an artifact.
    pub fn sign_artifact(&self, message: &str, hash: HashAlgorithm) -> Result<SignedArtifact> {
        let signature = self.sign(message, hash)?;
        Ok(SignedArtifact::new(message, STANDARD.encode(signature)))
    }
}

/// One-shot form: parse the key, resolve the hash name and sign.
///
/// 中文: 一次性签名，哈希名称无法识别时返回 `UnsupportedHash`。
pub fn sign(message: &str, private_key_pem: &str, hash: &str) -> Result<Vec<u8>> {
    let hash: HashAlgorithm = hash.parse()?;
    Signer::from_pem(private_key_pem)?.sign(message, hash)
}
