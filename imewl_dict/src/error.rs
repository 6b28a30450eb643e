use std::io;
use std::path::PathBuf;

use imewl_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DictError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("未知的文本编码：{0}")]
    UnknownEncoding(String),

    #[error("无法读写文件 {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("文件 {} 不是有效的 {encoding} 文本", .path.display())]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("文本中有 {encoding} 无法表示的字符，未写入 {}", .path.display())]
    Encode {
        path: PathBuf,
        encoding: &'static str,
    },
}
