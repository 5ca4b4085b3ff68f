//! The signed-artifact text document.
//!
//! Wire format (exact, case-sensitive, `\n` line endings):
//!
//! ```text
//! Mensaje original:
//! <message, may span lines>
//!
//! Firma (base64):
//! <signature>
//! ```
//!
//! Parsing splits on the literal labels instead of pattern matching. The message
//! starts after the *first* message label, wherever it sits (a byte-order mark or a
//! preamble line before it is ignored), and is bounded by the *last* signature
//! label, so a message that itself contains blank lines, or even the label text,
//! is recovered exactly. Base64 never contains the label, which is what makes the
//! last occurrence unambiguous.
//!
//! 中文: 签名文件的文本格式与结构化解析器。消息部分不做任何裁剪。

use tracing::debug;

use crate::error::{Error, Result};

/// Label opening the message field, including its line break.
pub const MESSAGE_LABEL: &str = "Mensaje original:\n";

/// Separator between message and signature: the blank line plus the signature label.
pub const SIGNATURE_SEPARATOR: &str = "\n\nFirma (base64):\n";

/// A message bound to its base64 signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedArtifact {
    message: String,
    signature_base64: String,
}

impl SignedArtifact {
    pub fn new(message: impl Into<String>, signature_base64: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            signature_base64: signature_base64.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn signature_base64(&self) -> &str {
        &self.signature_base64
    }

    /// Renders the document. Nothing follows the signature, not even a newline.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            MESSAGE_LABEL.len()
                + self.message.len()
                + SIGNATURE_SEPARATOR.len()
                + self.signature_base64.len(),
        );
        out.push_str(MESSAGE_LABEL);
        out.push_str(&self.message);
        out.push_str(SIGNATURE_SEPARATOR);
        out.push_str(&self.signature_base64);
        out
    }

    /// Parses a document produced by [`render`](Self::render).
    ///
    /// The message is returned byte-for-byte. Only ASCII whitespace around the
    /// signature is dropped, which is lossless for base64. Text before the first
    /// message label is ignored. A missing label is a [`Error::MalformedArtifact`].
    pub fn parse(text: &str) -> Result<Self> {
        let start = text.find(MESSAGE_LABEL).ok_or_else(|| {
            Error::MalformedArtifact("message label not found".to_string())
        })?;
        let body = &text[start + MESSAGE_LABEL.len()..];

        let (message, signature) = body.rsplit_once(SIGNATURE_SEPARATOR).ok_or_else(|| {
            Error::MalformedArtifact(
                "signature label missing or not preceded by a blank line".to_string(),
            )
        })?;

        let signature = signature.trim_matches(|c: char| c.is_ascii_whitespace());
        if signature.is_empty() {
            return Err(Error::MalformedArtifact("signature field is empty".to_string()));
        }

        debug!(
            message_len = message.len(),
            signature_len = signature.len(),
            "parsed signed artifact"
        );
        Ok(Self::new(message, signature))
    }
}

impl std::str::FromStr for SignedArtifact {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for SignedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// 渲染签名文件，等同于 `SignedArtifact::new(..).render()`
pub fn render_artifact(message: &str, signature_base64: &str) -> String {
    SignedArtifact::new(message, signature_base64).render()
}
