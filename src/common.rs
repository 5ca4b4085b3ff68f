//! 通用模块，包含哈希算法选择器与配置

pub mod config;
pub mod hash;

pub use self::config::SignerConfig;
pub use self::hash::HashAlgorithm;
