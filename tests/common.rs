//!
//! 集成测试的通用辅助函数
//!
#![allow(dead_code)]

use seal_sign::{HashAlgorithm, KeyPair, Signer};
use std::sync::OnceLock;

/// 每个测试二进制共享一个密钥对，避免重复生成 2048 位密钥。
pub fn shared_pair() -> &'static KeyPair {
    static PAIR: OnceLock<KeyPair> = OnceLock::new();
    PAIR.get_or_init(|| KeyPair::generate().unwrap())
}

/// 第二个独立生成的密钥对，用于错误密钥测试。
pub fn other_pair() -> &'static KeyPair {
    static PAIR: OnceLock<KeyPair> = OnceLock::new();
    PAIR.get_or_init(|| KeyPair::generate().unwrap())
}

pub fn public_pem(pair: &KeyPair) -> String {
    pair.public_key().to_pem().unwrap()
}

pub fn private_pem(pair: &KeyPair) -> String {
    pair.private_key().to_pem().unwrap().to_string()
}

/// Signs `message` with the shared pair and returns the rendered artifact.
pub fn signed_artifact(message: &str) -> String {
    Signer::new(shared_pair().private_key().clone())
        .sign_artifact(message, HashAlgorithm::Sha256)
        .unwrap()
        .render()
}
