//!
//! # 通用配置模块
//!
//! `SignerConfig` describes where a calling layer keeps the key pair and the signed
//! artifacts, and which digest is used when the caller does not choose one.
//! The modulus length is a protocol constant and intentionally absent here.
//!
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::hash::HashAlgorithm;
use crate::error::Error;

pub const ENV_DEFAULT_HASH: &str = "SEAL_SIGN_DEFAULT_HASH";
pub const ENV_KEY_DIR: &str = "SEAL_SIGN_KEY_DIR";
pub const ENV_ARTIFACT_DIR: &str = "SEAL_SIGN_ARTIFACT_DIR";

/// 签名服务配置
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SignerConfig {
    /// 未指定时使用的摘要算法
    pub default_hash: HashAlgorithm,
    /// 密钥文件目录
    pub key_dir: PathBuf,
    /// 签名文件目录
    pub artifact_dir: PathBuf,
    /// 公钥文件名
    pub public_key_file: String,
    /// 私钥文件名
    pub private_key_file: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            default_hash: HashAlgorithm::Sha256,
            key_dir: PathBuf::from("claves"),
            artifact_dir: PathBuf::from("firmados"),
            public_key_file: "public.key".to_string(),
            private_key_file: "private.key".to_string(),
        }
    }
}

impl SignerConfig {
    /// 从 JSON 文件加载配置，缺失的字段使用默认值
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: SignerConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// 默认配置叠加环境变量
    pub fn from_env() -> Result<Self, Error> {
        Self::default().apply_env()
    }

    /// 使用环境变量覆盖当前配置
    pub fn apply_env(self) -> Result<Self, Error> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars<F>(mut self, lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_DEFAULT_HASH) {
            self.default_hash = value.parse()?;
        }
        if let Some(value) = lookup(ENV_KEY_DIR) {
            self.key_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_ARTIFACT_DIR) {
            self.artifact_dir = PathBuf::from(value);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_matches_reference_layout() {
        let config = SignerConfig::default();
        assert_eq!(config.default_hash, HashAlgorithm::Sha256);
        assert_eq!(config.key_dir, PathBuf::from("claves"));
        assert_eq!(config.artifact_dir, PathBuf::from("firmados"));
        assert_eq!(config.public_key_file, "public.key");
        assert_eq!(config.private_key_file, "private.key");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SignerConfig =
            serde_json::from_str(r#"{ "default_hash": "sha512", "key_dir": "/tmp/k" }"#).unwrap();
        assert_eq!(config.default_hash, HashAlgorithm::Sha512);
        assert_eq!(config.key_dir, PathBuf::from("/tmp/k"));
        assert_eq!(config.artifact_dir, PathBuf::from("firmados"));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = SignerConfig {
            default_hash: HashAlgorithm::Sha384,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(SignerConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_DEFAULT_HASH, "SHA-384"),
            (ENV_ARTIFACT_DIR, "/var/firmados"),
        ]
        .into_iter()
        .collect();
        let config = SignerConfig::default()
            .apply_vars(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.default_hash, HashAlgorithm::Sha384);
        assert_eq!(config.artifact_dir, PathBuf::from("/var/firmados"));
        assert_eq!(config.key_dir, PathBuf::from("claves"));
    }

    #[test]
    fn test_env_bad_hash_is_rejected() {
        let result = SignerConfig::default().apply_vars(|key| {
            (key == ENV_DEFAULT_HASH).then(|| "md5".to_string())
        });
        assert!(matches!(result, Err(Error::UnsupportedHash(_))));
    }
}
