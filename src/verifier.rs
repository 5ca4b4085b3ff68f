//! `Verifier` 校验签名文件。
//!
//! Verification has three outcomes, kept apart at the type level:
//!
//! - `Ok(Verdict::Valid)`: the signature matches.
//! - `Ok(Verdict::Invalid)`: the input was well formed but the signature does not
//!   match (tampered message, tampered signature, or wrong key).
//! - `Err(_)`: the input could not be checked (malformed document, bad base64,
//!   bad key, unknown hash).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};

use crate::artifact::SignedArtifact;
use crate::common::hash::HashAlgorithm;
use crate::error::{Error, Result};
use crate::keys::PublicKey;

/// Result of a conclusive verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Valid,
    Invalid,
}

impl Verdict {
    pub fn is_valid(self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// Turns `Invalid` into [`Error::VerificationFailed`].
    pub fn into_result(self) -> Result<()> {
        match self {
            Verdict::Valid => Ok(()),
            Verdict::Invalid => Err(Error::VerificationFailed),
        }
    }
}

impl From<Verdict> for bool {
    fn from(verdict: Verdict) -> Self {
        verdict.is_valid()
    }
}

/// Checks signed artifacts against one public key. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct Verifier {
    public_key: PublicKey,
}

impl Verifier {
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// Builds a verifier from PEM text; fails with [`Error::KeyFormat`].
    pub fn from_pem(public_key_pem: &str) -> Result<Self> {
        Ok(Self::new(PublicKey::from_pem(public_key_pem)?))
    }

    /// Parses `artifact_text` and checks its signature.
    pub fn verify(&self, artifact_text: &str, hash: HashAlgorithm) -> Result<Verdict> {
        let artifact = SignedArtifact::parse(artifact_text).inspect_err(|e| {
            warn!(error = %e, "rejected signed artifact");
        })?;
        self.verify_artifact(&artifact, hash)
    }

    /// Checks an already parsed artifact.
    pub fn verify_artifact(&self, artifact: &SignedArtifact, hash: HashAlgorithm) -> Result<Verdict> {
        let signature = STANDARD.decode(artifact.signature_base64())?;
        self.verify_signature(artifact.message(), &signature, hash)
    }

    /// Checks raw signature bytes over `hash(message)`.
    pub fn verify_signature(
        &self,
        message: &str,
        signature: &[u8],
        hash: HashAlgorithm,
    ) -> Result<Verdict> {
        let digest = hash.digest(message.as_bytes());
        let verdict = match self
            .public_key
            .as_rsa()
            .verify(hash.padding(), &digest, signature)
        {
            Ok(()) => Verdict::Valid,
            Err(rsa::Error::Verification) => Verdict::Invalid,
            Err(e) => return Err(Error::KeyFormat(format!("RSA verification failed: {e}"))),
        };
        debug!(%hash, ?verdict, "verified signature");
        Ok(verdict)
    }
}

/// One-shot form with the SHA-256 default, for callers holding only text.
///
/// 中文: 一次性校验，默认使用 SHA-256。
pub fn verify(artifact_text: &str, public_key_pem: &str) -> Result<Verdict> {
    verify_with_hash(artifact_text, public_key_pem, HashAlgorithm::default())
}

pub fn verify_with_hash(
    artifact_text: &str,
    public_key_pem: &str,
    hash: HashAlgorithm,
) -> Result<Verdict> {
    Verifier::from_pem(public_key_pem)?.verify(artifact_text, hash)
}
