//! 文本编解码：按编码标签（`utf-8`、`gbk`、`utf-16le` ...）读写词库与映射表文件。

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};

use crate::error::DictError;

/// 解析编码标签；空标签视为 UTF-8。
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, DictError> {
    let label = label.trim();
    if label.is_empty() {
        return Ok(UTF_8);
    }
    Encoding::for_label(label.as_bytes()).ok_or_else(|| DictError::UnknownEncoding(label.to_string()))
}

/// 解码；带 BOM 时以 BOM 为准。遇到非法字节返回 `None`。
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if used != encoding {
        tracing::debug!(declared = encoding.name(), detected = used.name(), "BOM overrides declared encoding");
    }
    (!had_errors).then(|| text.into_owned())
}

/// 编码；UTF-16 输出带 BOM。遇到无法表示的字符返回 `None`。
pub fn encode(text: &str, encoding: &'static Encoding) -> Option<Vec<u8>> {
    if encoding == UTF_16LE || encoding == UTF_16BE {
        let little = encoding == UTF_16LE;
        let mut out = Vec::with_capacity(2 + text.len() * 2);
        out.extend_from_slice(if little { &[0xFF, 0xFE] } else { &[0xFE, 0xFF] });
        for unit in text.encode_utf16() {
            let bytes = if little { unit.to_le_bytes() } else { unit.to_be_bytes() };
            out.extend_from_slice(&bytes);
        }
        return Some(out);
    }
    let (bytes, _, had_errors) = encoding.encode(text);
    (!had_errors).then(|| bytes.into_owned())
}

pub fn read_text(path: &Path, label: &str) -> Result<String, DictError> {
    let encoding = resolve_encoding(label)?;
    let bytes = fs::read(path).map_err(|source| DictError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&bytes, encoding).ok_or_else(|| DictError::Decode {
        path: path.to_path_buf(),
        encoding: encoding.name(),
    })
}

pub fn write_text(path: &Path, text: &str, label: &str) -> Result<(), DictError> {
    let encoding = resolve_encoding(label)?;
    let bytes = encode(text, encoding).ok_or_else(|| DictError::Encode {
        path: path.to_path_buf(),
        encoding: encoding.name(),
    })?;
    fs::write(path, bytes).map_err(|source| DictError::Io {
        path: path.to_path_buf(),
        source,
    })
}
