//! # Seal-Sign: RSA message signatures in a portable text document
//!
//! `seal-sign` generates 2048-bit RSA key pairs, signs UTF-8 messages with
//! RSA PKCS#1 v1.5, and binds message and base64 signature into a signed-artifact
//! document that can be verified later against a public key.
//!
//! ## Core Concepts
//!
//! - **`KeyPairGenerator`**: produces a `KeyPair`; keys travel as PKCS#1 PEM text.
//! - **`Signer`**: signs a message with a `PrivateKey` and a `HashAlgorithm`.
//! - **`SignedArtifact`**: the text document binding message and signature.
//! - **`Verifier`**: parses a document and returns a `Verdict`, or an error when the
//!   input could not be checked at all.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seal_sign::{HashAlgorithm, KeyPair, Signer, Verdict, Verifier};
//!
//! fn main() -> seal_sign::Result<()> {
//!     let pair = KeyPair::generate()?;
//!
//!     let artifact = Signer::new(pair.private_key().clone())
//!         .sign_artifact("hello world", HashAlgorithm::Sha256)?
//!         .render();
//!
//!     let verdict = Verifier::new(pair.public_key().clone())
//!         .verify(&artifact, HashAlgorithm::Sha256)?;
//!     assert_eq!(verdict, Verdict::Valid);
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod common;
pub mod error;
pub mod keys;
pub mod signer;
pub mod verifier;

#[cfg(feature = "storage")]
pub mod service;
#[cfg(feature = "storage")]
pub mod storage;

pub use artifact::{SignedArtifact, render_artifact};
pub use common::{HashAlgorithm, SignerConfig};
pub use error::{Error, ErrorKind, Result};
pub use keys::{KeyKind, KeyPair, KeyPairGenerator, PrivateKey, PublicKey, RSA_KEY_BITS};
pub use signer::Signer;
pub use verifier::{Verdict, Verifier};

#[cfg(feature = "storage")]
pub use service::{SignOutcome, SigningService};

/// The version of the `seal-sign` crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
