use seal_sign::{HashAlgorithm, KeyPair, Signer, Verdict, Verifier};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 生成密钥对并导出 PEM
    let pair = KeyPair::generate()?;
    let (public_pem, _private_pem) = pair.to_pem()?;
    println!("{public_pem}");

    // 签名并渲染签名文件
    let artifact = Signer::new(pair.private_key().clone())
        .sign_artifact("hello world", HashAlgorithm::Sha256)?
        .render();
    println!("{artifact}\n");

    // 使用 PEM 公钥校验
    let verifier = Verifier::from_pem(&public_pem)?;
    match verifier.verify(&artifact, HashAlgorithm::Sha256)? {
        Verdict::Valid => println!("Firma válida"),
        Verdict::Invalid => println!("Firma no válida"),
    }

    // 篡改消息后校验失败
    let tampered = artifact.replace("hello", "howdy");
    let verdict = verifier.verify(&tampered, HashAlgorithm::Sha256)?;
    println!("tampered: {verdict:?}");

    Ok(())
}
