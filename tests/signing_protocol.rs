//!
//! # 签名协议测试
//!
//! 端到端验证：生成密钥 -> 签名 -> 渲染签名文件 -> 解析 -> 校验，
//! 以及篡改、错误密钥、格式错误和 Base64 损坏等情况。
//!

mod common;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use common::{other_pair, private_pem, public_pem, shared_pair, signed_artifact};
use seal_sign::{
    Error, ErrorKind, HashAlgorithm, KeyPair, SignedArtifact, Signer, Verdict, Verifier, signer,
    verifier,
};

/// Replaces the character at `idx` with a different base64 character (ASCII input only).
fn flip_char(text: &str, idx: usize) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    chars[idx] = if chars[idx] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

#[test]
fn test_hello_world_scenario() {
    let artifact = signed_artifact("hello world");
    assert!(artifact.starts_with("Mensaje original:\nhello world\n\nFirma (base64):\n"));

    let valid = verifier::verify(&artifact, &public_pem(shared_pair())).unwrap();
    assert_eq!(valid, Verdict::Valid);

    let other = verifier::verify(&artifact, &public_pem(other_pair())).unwrap();
    assert_eq!(other, Verdict::Invalid);
}

#[test]
fn test_roundtrip_varied_messages() {
    let messages = [
        "",
        " ",
        "hello world",
        "trailing newline\n",
        "\n\nleading blank lines",
        "párrafo uno\n\npárrafo dos — ñ, ü, 你好, 🦀",
        "contains the label\n\nFirma (base64):\nfake",
        "Mensaje original:\nnested",
    ];
    let verifier = Verifier::new(shared_pair().public_key().clone());
    for message in messages {
        let artifact = signed_artifact(message);
        let parsed = SignedArtifact::parse(&artifact).unwrap();
        assert_eq!(parsed.message(), message);
        assert_eq!(
            verifier.verify(&artifact, HashAlgorithm::Sha256).unwrap(),
            Verdict::Valid,
            "message {message:?}"
        );
    }
}

#[test]
fn test_one_shot_sign_then_verify() {
    let signature = signer::sign("hello world", &private_pem(shared_pair()), "sha256").unwrap();
    let artifact = seal_sign::render_artifact("hello world", &STANDARD.encode(signature));
    assert_eq!(
        verifier::verify(&artifact, &public_pem(shared_pair())).unwrap(),
        Verdict::Valid
    );
}

#[test]
fn test_any_single_message_char_flip_is_rejected() {
    let message = "Transfer 100 to Alice";
    let artifact = signed_artifact(message);
    let verifier = Verifier::new(shared_pair().public_key().clone());
    let offset = "Mensaje original:\n".len();

    for idx in offset..offset + message.len() {
        let tampered = flip_char(&artifact, idx);
        let result = verifier.verify(&tampered, HashAlgorithm::Sha256);
        assert!(
            matches!(result, Ok(Verdict::Invalid) | Err(_)),
            "flip at {idx} was accepted"
        );
    }
}

#[test]
fn test_signature_char_flips_are_rejected() {
    let artifact = signed_artifact("hello world");
    let verifier = Verifier::new(shared_pair().public_key().clone());
    let sig_start = artifact.rfind('\n').unwrap() + 1;

    // 每隔若干字符翻转一次，覆盖开头、中间与结尾（含填充前的最后字符）
    let sig_len = artifact.len() - sig_start;
    let mut positions: Vec<usize> = (0..sig_len).step_by(17).collect();
    positions.push(sig_len - 3);
    for pos in positions {
        let tampered = flip_char(&artifact, sig_start + pos);
        let result = verifier.verify(&tampered, HashAlgorithm::Sha256);
        match result {
            Ok(verdict) => assert_eq!(verdict, Verdict::Invalid, "flip at {pos}"),
            Err(e) => assert!(e.is_inconclusive(), "flip at {pos}: {e}"),
        }
    }
}

#[test]
fn test_missing_signature_label_is_malformed() {
    let artifact = signed_artifact("hello world");
    let cut = artifact.replace("Firma (base64):", "Signature:");
    let err = verifier::verify(&cut, &public_pem(shared_pair())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedArtifact);
    assert!(err.is_inconclusive());
}

#[test]
fn test_empty_document_is_malformed() {
    let err = verifier::verify("", &public_pem(shared_pair())).unwrap_err();
    assert!(matches!(err, Error::MalformedArtifact(_)));
}

#[test]
fn test_non_base64_signature_is_encoding_error() {
    let artifact = "Mensaje original:\nhello world\n\nFirma (base64):\n%%% not base64 %%%";
    let err = verifier::verify(artifact, &public_pem(shared_pair())).unwrap_err();
    assert!(matches!(err, Error::Encoding(_)));
}

#[test]
fn test_bad_public_key_is_key_format_error() {
    let artifact = signed_artifact("hello world");
    let err = verifier::verify(&artifact, "-----BEGIN RSA PUBLIC KEY-----\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyFormat);
}

#[test]
fn test_wrong_hash_at_verify_time_is_invalid() {
    let artifact = Signer::new(shared_pair().private_key().clone())
        .sign_artifact("hello world", HashAlgorithm::Sha384)
        .unwrap()
        .render();
    let public = public_pem(shared_pair());
    assert_eq!(
        verifier::verify_with_hash(&artifact, &public, HashAlgorithm::Sha384).unwrap(),
        Verdict::Valid
    );
    assert_eq!(verifier::verify(&artifact, &public).unwrap(), Verdict::Invalid);
}

#[test]
fn test_fresh_key_pairs_are_distinct_and_usable() {
    let a = KeyPair::generate().unwrap();
    let b = KeyPair::generate().unwrap();
    assert_ne!(public_pem(&a), public_pem(&b));

    for pair in [&a, &b] {
        let artifact = Signer::new(pair.private_key().clone())
            .sign_artifact("hello world", HashAlgorithm::Sha256)
            .unwrap()
            .render();
        let verifier = Verifier::new(pair.public_key().clone());
        assert!(verifier.verify(&artifact, HashAlgorithm::Sha256).unwrap().is_valid());
    }
}

#[test]
fn test_unsupported_hash_name() {
    let err = signer::sign("hello", &private_pem(shared_pair()), "whirlpool").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedHash);
}
