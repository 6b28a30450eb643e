//! 错误分类：
//! - `ConfigError`：配置错误，在处理任何词条之前一次性抛出
//! - `EntryGenerationFailure`：导出时单个词条无法生成编码，跳过并记录
//! - `LineParseFailure`：导入时单行无法解析，跳过并记录

use thiserror::Error;

use crate::model::CodeType;
use crate::pattern::Field;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("编码方案「{code_type}」需要字符编码映射文件，但未指定映射表路径")]
    MissingMappingTable { code_type: CodeType },

    #[error("字段「{first}」与「{second}」的位置重复：{position}")]
    DuplicateFieldPosition {
        first: Field,
        second: Field,
        position: u8,
    },

    #[error("字段「{0}」在布局中出现了不止一次")]
    RepeatedField(Field),

    #[error("字段分隔符不能为空")]
    EmptyFieldDelimiter,

    #[error("逐字编码模式下编码分隔符不能为空")]
    EmptyCodeDelimiter,

    #[error("编码分隔符「{code}」与字段分隔符「{field}」互相包含，导出的行无法再切分回来")]
    CodeDelimiterClashesWithField { code: String, field: String },

    #[error("{name}不能包含换行符")]
    LineBreakInDelimiter { name: &'static str },

    #[error("多字词编码格式「{format}」无效：{reason}")]
    InvalidCodeFormat { format: String, reason: String },

    #[error("未知的编码方案：{0}")]
    UnknownCodeType(String),

    #[error("未知的字段：{0}（可选 code / word / rank）")]
    UnknownField(String),

    #[error("字段布局中缺少词（word）字段")]
    MissingWordField,

    #[error("未知的编码分隔方式：{0}（可选 infix / prefix / suffix / both）")]
    UnknownSplitMode(String),
}

/// 导出时跳过某个词条的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("词为空")]
    EmptyWord,
    #[error("无法得到任何编码")]
    NoCode,
    #[error("词、编码或词频中含有字段分隔符或换行符")]
    DelimiterInField,
    #[error("某个字的编码中含有编码分隔符")]
    DelimiterInCode,
}

/// 导出失败的词条（不中断整批导出）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("第 {index} 个词条「{word}」未导出：{reason}")]
pub struct EntryGenerationFailure {
    /// 词条在输入序列中的下标（从 0 开始）
    pub index: usize,
    pub word: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineErrorKind {
    #[error("缺少词字段")]
    MissingWord,
    #[error("词频「{0}」不是非负整数")]
    InvalidRank(String),
}

/// 导入失败的行（不中断整批导入）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("第 {line_no} 行「{line}」无法导入：{reason}")]
pub struct LineParseFailure {
    /// 文本中的行号（从 1 开始，按 `\n` 计数）
    pub line_no: usize,
    pub line: String,
    pub reason: LineErrorKind,
}
