//! RSA key handles and the key pair generator.
//!
//! Keys travel between components only as PKCS#1 PEM text. `PublicKey` and
//! `PrivateKey` are the explicit handles that [`Signer`](crate::signer::Signer)
//! and [`Verifier`](crate::verifier::Verifier) are built from; where the PEM text
//! lives is the caller's business.
//!
//! 中文: RSA 密钥句柄与密钥对生成器。密钥在组件之间仅以 PKCS#1 PEM 文本传递。

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, LineEnding};
use rsa::rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Modulus length of every generated key pair.
pub const RSA_KEY_BITS: usize = 2048;

/// Which half of a key pair a file or request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Public,
    Private,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Public => f.write_str("public"),
            KeyKind::Private => f.write_str("private"),
        }
    }
}

impl FromStr for KeyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" | "publica" | "pública" | "pub" => Ok(KeyKind::Public),
            "private" | "privada" | "priv" => Ok(KeyKind::Private),
            other => Err(Error::KeyFormat(format!("unknown key kind '{other}'"))),
        }
    }
}

/// RSA 公钥句柄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    /// Parses a PKCS#1 (`RSA PUBLIC KEY`) or SPKI (`PUBLIC KEY`) PEM document.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let pem = pem.trim();
        let key = match RsaPublicKey::from_pkcs1_pem(pem) {
            Ok(key) => key,
            Err(pkcs1_err) => RsaPublicKey::from_public_key_pem(pem).map_err(|spki_err| {
                Error::KeyFormat(format!(
                    "public key is neither PKCS#1 ({pkcs1_err}) nor SPKI ({spki_err})"
                ))
            })?,
        };
        debug!(bits = key.size() * 8, "parsed RSA public key");
        Ok(Self(key))
    }

    /// 导出为 PKCS#1 PEM
    pub fn to_pem(&self) -> Result<String> {
        self.0
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| Error::KeyFormat(format!("exporting public key failed: {e}")))
    }

    pub fn bits(&self) -> usize {
        self.0.size() * 8
    }

    pub(crate) fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }
}

/// RSA 私钥句柄
///
/// The wrapped `RsaPrivateKey` zeroizes its components on drop.
#[derive(Clone)]
pub struct PrivateKey(RsaPrivateKey);

impl PrivateKey {
    /// Parses a PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`) PEM document.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let pem = pem.trim();
        let key = match RsaPrivateKey::from_pkcs1_pem(pem) {
            Ok(key) => key,
            Err(pkcs1_err) => RsaPrivateKey::from_pkcs8_pem(pem).map_err(|pkcs8_err| {
                Error::KeyFormat(format!(
                    "private key is neither PKCS#1 ({pkcs1_err}) nor PKCS#8 ({pkcs8_err})"
                ))
            })?,
        };
        debug!(bits = key.size() * 8, "parsed RSA private key");
        Ok(Self(key))
    }

    /// 导出为 PKCS#1 PEM，返回值在释放时清零
    pub fn to_pem(&self) -> Result<Zeroizing<String>> {
        self.0
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| Error::KeyFormat(format!("exporting private key failed: {e}")))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(RsaPublicKey::from(&self.0))
    }

    pub fn bits(&self) -> usize {
        self.0.size() * 8
    }

    pub(crate) fn as_rsa(&self) -> &RsaPrivateKey {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

/// Both halves of one RSA key pair, always produced together.
#[derive(Debug, Clone)]
pub struct KeyPair {
    public: PublicKey,
    private: PrivateKey,
}

impl KeyPair {
    /// Shorthand for `KeyPairGenerator::new().generate()`.
    pub fn generate() -> Result<Self> {
        KeyPairGenerator::new().generate()
    }

    /// Rebuilds a pair from its PEM halves, rejecting halves that do not belong together.
    pub fn from_pem(public_pem: &str, private_pem: &str) -> Result<Self> {
        let public = PublicKey::from_pem(public_pem)?;
        let private = PrivateKey::from_pem(private_pem)?;
        if private.public_key() != public {
            return Err(Error::KeyFormat(
                "public key does not belong to the private key".to_string(),
            ));
        }
        Ok(Self { public, private })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    pub fn modulus_bits(&self) -> usize {
        self.public.bits()
    }

    /// Serializes both halves as PKCS#1 PEM: `(public, private)`.
    pub fn to_pem(&self) -> Result<(String, Zeroizing<String>)> {
        Ok((self.public.to_pem()?, self.private.to_pem()?))
    }

    pub fn into_parts(self) -> (PublicKey, PrivateKey) {
        (self.public, self.private)
    }
}

/// 生成 2048 位 RSA 密钥对，随机数来自操作系统。
///
/// The public exponent is the library default (65537). A failure here is a fault of
/// the random source or the RSA backend and is not retried.
#[derive(Debug, Clone, Copy)]
pub struct KeyPairGenerator {
    bits: usize,
}

impl Default for KeyPairGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyPairGenerator {
    pub fn new() -> Self {
        Self { bits: RSA_KEY_BITS }
    }

    pub fn generate(&self) -> Result<KeyPair> {
        let mut rng = OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, self.bits)
            .map_err(|e| Error::KeyGeneration(format!("generating RSA key failed: {e}")))?;
        let public_key = RsaPublicKey::from(&private_key);
        info!(bits = self.bits, "generated RSA key pair");

        Ok(KeyPair {
            public: PublicKey(public_key),
            private: PrivateKey(private_key),
        })
    }
}
