//! Filesystem helpers for a calling layer: the key pair files and the signed artifacts.
// 中文: 供调用层使用的文件存储：密钥文件与签名文件。核心签名/校验逻辑不访问文件系统。

pub mod artifact_store;
pub mod key_store;

pub use artifact_store::ArtifactStore;
pub use key_store::KeyStore;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Writes `contents` next to `path` and renames it into place, so a reader never
/// observes a half-written file. With `mode` set, the temp file is created with
/// those Unix permissions, so key material is never readable by others.
/// The temp file is removed when any step fails.
// 中文: 原子写入，防止在写入中断时数据损坏。
pub(crate) fn write_atomic(path: &Path, contents: &[u8], mode: Option<u32>) -> io::Result<()> {
    let temp_path = path.with_extension("tmp");
    // A stale temp file would keep its old permissions.
    match fs::remove_file(&temp_path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let result = write_new(&temp_path, contents, mode).and_then(|()| fs::rename(&temp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_new(path: &Path, contents: &[u8], mode: Option<u32>) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    if let Some(mode) = mode {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Writes everything to `writer`; on failure deletes `path`, the file behind it.
// 中文: 写入失败时删除半写入的文件。
pub(crate) fn write_or_discard<W: Write>(mut writer: W, path: &Path, contents: &[u8]) -> io::Result<()> {
    let result = writer.write_all(contents).and_then(|()| writer.flush());
    drop(writer);
    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}
