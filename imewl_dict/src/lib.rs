//! `imewl_dict`：文件层。
//!
//! - 构建映射表：拼音用内置表，其他方案从映射表文件读取
//! - 按配置的文本编码读写自定义格式词库文件
//!
//! 逻辑本身都在 `imewl_core`，这里只负责把文件内容交给它。

mod error;
pub mod text;

use std::path::Path;

use imewl_core::{
    CodeType, ConfigError, ExportReport, ImportReport, LineCodec, MappingTable, PatternConfig,
    WordLibrary,
};
use imewl_pinyin::pinyin_table;

pub use error::DictError;
pub use text::{read_text, resolve_encoding, write_text};

/// 为编码方案构建映射表。
///
/// - 拼音：返回内置表，忽略 `path`
/// - 其他方案：`path` 为空时返回配置错误；文件中格式错误的行跳过，不算失败
pub fn build_mapping_table(
    code_type: CodeType,
    path: Option<&Path>,
    encoding: &str,
) -> Result<MappingTable, DictError> {
    if !code_type.requires_mapping_table() {
        return Ok(pinyin_table());
    }
    let path = path
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(ConfigError::MissingMappingTable { code_type })?;
    let text = read_text(path, encoding)?;
    let table = MappingTable::parse_str(&text);
    tracing::info!(path = %path.display(), keys = table.len(), "mapping table loaded");
    Ok(table)
}

/// 按配置中的方案、映射表路径与文本编码构建映射表。
pub fn mapping_table_for(config: &PatternConfig) -> Result<MappingTable, DictError> {
    build_mapping_table(
        config.code_type,
        config.mapping_table_path.as_deref(),
        &config.text_encoding,
    )
}

/// 读取词库文件并按 codec 的格式导入。
pub fn import_file(codec: &LineCodec<'_>, path: &Path) -> Result<ImportReport, DictError> {
    let text = read_text(path, &codec.config().text_encoding)?;
    Ok(codec.import(&text))
}

/// 按 codec 的格式导出并写入文件；被跳过的词条在返回的报告里。
pub fn export_file(
    codec: &LineCodec<'_>,
    entries: &[WordLibrary],
    path: &Path,
) -> Result<ExportReport, DictError> {
    let report = codec.export(entries);
    write_text(path, &report.text, &codec.config().text_encoding)?;
    Ok(report)
}
