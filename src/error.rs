//! Defines the custom error type for the `seal-sign` crate.
// 中文: 定义 `seal-sign` crate 的统一错误类型。

use crate::keys::KeyKind;
use thiserror::Error;

/// The main error type for the `seal-sign` crate.
///
/// Every variant except [`Error::VerificationFailed`] means the operation was
/// *inconclusive*: the inputs could not even be checked. `VerificationFailed` is
/// the only *negative* outcome, i.e. well-formed input whose signature does not match.
///
/// 中文: `seal-sign` 的主错误类型。除 `VerificationFailed` 外，所有变体都表示输入无法被检查。
#[derive(Debug, Error)]
pub enum Error {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("invalid key format: {0}")]
    KeyFormat(String),

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedHash(String),

    #[error("malformed signed artifact: {0}")]
    MalformedArtifact(String),

    #[error("decoding from Base64 failed: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("signature verification failed")]
    VerificationFailed,

    #[error("{0} key not found")]
    KeyNotFound(KeyKind),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// A `Copy` discriminant of [`Error`], for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    KeyGeneration,
    KeyFormat,
    UnsupportedHash,
    MalformedArtifact,
    Encoding,
    VerificationFailed,
    KeyNotFound,
    Io,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::KeyGeneration(_) => ErrorKind::KeyGeneration,
            Error::KeyFormat(_) => ErrorKind::KeyFormat,
            Error::UnsupportedHash(_) => ErrorKind::UnsupportedHash,
            Error::MalformedArtifact(_) => ErrorKind::MalformedArtifact,
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::VerificationFailed => ErrorKind::VerificationFailed,
            Error::KeyNotFound(_) => ErrorKind::KeyNotFound,
            Error::Io(_) => ErrorKind::Io,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns `true` when the input could not be checked at all, as opposed to
    /// a signature that was checked and did not match.
    pub fn is_inconclusive(&self) -> bool {
        !matches!(self, Error::VerificationFailed)
    }

    /// A short human-readable sentence for the caller-facing layer, distinct per kind.
    ///
    /// 中文: 面向用户的提示信息，每种错误各不相同。
    pub fn user_message(&self) -> String {
        match self {
            Error::KeyGeneration(_) => {
                "The key pair could not be generated; the system random source failed.".to_string()
            }
            Error::KeyFormat(_) => "The supplied key is not a valid RSA PEM key.".to_string(),
            Error::UnsupportedHash(name) => {
                format!("The hash algorithm '{name}' is not supported.")
            }
            Error::MalformedArtifact(_) => {
                "The signed message file does not have the expected format.".to_string()
            }
            Error::Encoding(_) => "The signature in the file is not valid Base64.".to_string(),
            Error::VerificationFailed => {
                "The signature does not match the message and public key.".to_string()
            }
            Error::KeyNotFound(kind) => {
                format!("No {kind} key found. Generate the key pair first.")
            }
            Error::Io(err) => format!("A file could not be read or written: {err}."),
            Error::Config(err) => format!("The configuration file is invalid: {err}."),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn test_only_verification_failure_is_conclusive() {
        assert!(!Error::VerificationFailed.is_inconclusive());
        assert!(Error::MalformedArtifact("x".into()).is_inconclusive());
        assert!(Error::KeyFormat("x".into()).is_inconclusive());
        assert!(Error::UnsupportedHash("md4".into()).is_inconclusive());
        assert!(Error::Encoding(STANDARD.decode("*").unwrap_err()).is_inconclusive());
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let errors = [
            Error::KeyGeneration("rng".into()),
            Error::KeyFormat("pem".into()),
            Error::UnsupportedHash("md4".into()),
            Error::MalformedArtifact("label".into()),
            Error::Encoding(STANDARD.decode("*").unwrap_err()),
            Error::VerificationFailed,
            Error::KeyNotFound(KeyKind::Private),
            Error::Io(std::io::Error::other("disk")),
            Error::Config(serde_json::from_str::<u8>("x").unwrap_err()),
        ];
        let mut messages: Vec<String> = errors.iter().map(Error::user_message).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Error::VerificationFailed.kind(), ErrorKind::VerificationFailed);
        assert_eq!(
            Error::KeyNotFound(KeyKind::Public).kind(),
            ErrorKind::KeyNotFound
        );
    }
}
