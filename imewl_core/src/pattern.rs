//! `pattern`：用户自定义的行格式配置。
//!
//! 一行最多包含三个字段（编码、词、词频），其中词总是存在；
//! `FieldOrder` 为三个字段各保留一个位置，缺席的字段在编译模板时被跳过。

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::generator::CodeFormat;
use crate::model::CodeType;

/// 行中的字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Code,
    Word,
    Rank,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Code, Field::Word, Field::Rank];

    fn index(self) -> usize {
        match self {
            Field::Code => 0,
            Field::Word => 1,
            Field::Rank => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Code => "code",
            Field::Word => "word",
            Field::Rank => "rank",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "code" | "c" | "编码" => Ok(Field::Code),
            "word" | "w" | "词" => Ok(Field::Word),
            "rank" | "r" | "词频" => Ok(Field::Rank),
            _ => Err(ConfigError::UnknownField(s.to_string())),
        }
    }
}

/// 三个字段各自的位置（越小越靠左）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOrder([u8; 3]);

impl Default for FieldOrder {
    fn default() -> Self {
        FieldOrder::new(0, 1, 2)
    }
}

impl FieldOrder {
    pub fn new(code: u8, word: u8, rank: u8) -> Self {
        FieldOrder([code, word, rank])
    }

    /// 按给定字段顺序排位；没列出的字段排在最后（保留位置但不出现）。
    pub fn from_layout(fields: &[Field]) -> Result<Self, ConfigError> {
        let mut slots: [Option<u8>; 3] = [None; 3];
        for (pos, &field) in fields.iter().enumerate() {
            let pos = pos as u8;
            if slots[field.index()].is_some() {
                return Err(ConfigError::RepeatedField(field));
            }
            slots[field.index()] = Some(pos);
        }
        if slots[Field::Word.index()].is_none() {
            return Err(ConfigError::MissingWordField);
        }
        let mut next = fields.len() as u8;
        let mut positions = [0u8; 3];
        for (i, slot) in slots.iter().enumerate() {
            positions[i] = match slot {
                Some(p) => *p,
                None => {
                    next += 1;
                    next - 1
                }
            };
        }
        Ok(FieldOrder(positions))
    }

    pub fn position(&self, field: Field) -> u8 {
        self.0[field.index()]
    }

    /// 给定字段按位置升序排列。
    pub fn sorted(&self, fields: &[Field]) -> Vec<Field> {
        let mut out = fields.to_vec();
        out.sort_by_key(|f| self.position(*f));
        out
    }
}

/// 逐字编码连接时分隔符放在哪里。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeSplitMode {
    /// `ai'ni`
    #[default]
    Infix,
    /// `'ai'ni`
    Prefix,
    /// `ai'ni'`
    Suffix,
    /// `'ai'ni'`
    Both,
}

impl CodeSplitMode {
    pub fn join(self, parts: &[&str], delimiter: &str) -> String {
        let mut out = String::new();
        if matches!(self, CodeSplitMode::Prefix | CodeSplitMode::Both) {
            out.push_str(delimiter);
        }
        out.push_str(&parts.join(delimiter));
        if matches!(self, CodeSplitMode::Suffix | CodeSplitMode::Both) {
            out.push_str(delimiter);
        }
        out
    }

    pub fn name(self) -> &'static str {
        match self {
            CodeSplitMode::Infix => "infix",
            CodeSplitMode::Prefix => "prefix",
            CodeSplitMode::Suffix => "suffix",
            CodeSplitMode::Both => "both",
        }
    }
}

impl fmt::Display for CodeSplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodeSplitMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "infix" | "none" => Ok(CodeSplitMode::Infix),
            "prefix" | "left" => Ok(CodeSplitMode::Prefix),
            "suffix" | "right" => Ok(CodeSplitMode::Suffix),
            "both" | "full" => Ok(CodeSplitMode::Both),
            _ => Err(ConfigError::UnknownSplitMode(s.to_string())),
        }
    }
}

/// 自定义格式配置：一次会话内只读。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternConfig {
    /// 目标编码方案
    pub code_type: CodeType,
    /// 行中是否有编码字段
    pub contains_code: bool,
    /// 行中是否有词频字段
    pub contains_rank: bool,
    pub field_order: FieldOrder,
    /// 字段之间的分隔符
    pub field_delimiter: String,
    /// 词条之间的分隔符（导出用；导入总是按 `\r` / `\n` 切分，
    /// 所以不含换行符的分隔符写出的文本无法按行导入回来）
    pub line_delimiter: String,
    /// 逐字编码之间的分隔符
    pub code_delimiter: String,
    pub code_split_mode: CodeSplitMode,
    /// 多字词编码格式，`{0}` 为第一个字的编码；为空时按 `code_delimiter` 连接
    pub multi_word_code_format: String,
    /// true：每个字一个编码；false：整个词作为一个键查编码
    pub one_char_one_code: bool,
    /// 自定义编码映射表路径（非拼音方案必填）
    pub mapping_table_path: Option<PathBuf>,
    /// 映射表与词库文本的编码标签（如 `utf-8`、`gbk`、`utf-16le`）
    pub text_encoding: String,
    /// 多音字展开时每个词最多生成多少个编码
    pub max_code_combinations: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            code_type: CodeType::Pinyin,
            contains_code: true,
            contains_rank: true,
            field_order: FieldOrder::default(),
            field_delimiter: "\t".to_string(),
            line_delimiter: "\n".to_string(),
            code_delimiter: "'".to_string(),
            code_split_mode: CodeSplitMode::Infix,
            multi_word_code_format: String::new(),
            one_char_one_code: true,
            mapping_table_path: None,
            text_encoding: "utf-8".to_string(),
            max_code_combinations: 64,
        }
    }
}

impl PatternConfig {
    pub fn new(code_type: CodeType) -> Self {
        Self::default().code_type(code_type)
    }

    pub fn code_type(mut self, code_type: CodeType) -> Self {
        self.code_type = code_type;
        self
    }

    pub fn contains_code(mut self, yes: bool) -> Self {
        self.contains_code = yes;
        self
    }

    pub fn contains_rank(mut self, yes: bool) -> Self {
        self.contains_rank = yes;
        self
    }

    pub fn field_order(mut self, order: FieldOrder) -> Self {
        self.field_order = order;
        self
    }

    /// 一次性设置出现的字段及其顺序，例如 `[Word, Code]`。
    pub fn layout(mut self, fields: &[Field]) -> Result<Self, ConfigError> {
        self.field_order = FieldOrder::from_layout(fields)?;
        self.contains_code = fields.contains(&Field::Code);
        self.contains_rank = fields.contains(&Field::Rank);
        Ok(self)
    }

    pub fn field_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.field_delimiter = delimiter.into();
        self
    }

    pub fn line_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.line_delimiter = delimiter.into();
        self
    }

    pub fn code_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.code_delimiter = delimiter.into();
        self
    }

    pub fn code_split_mode(mut self, mode: CodeSplitMode) -> Self {
        self.code_split_mode = mode;
        self
    }

    pub fn multi_word_code_format(mut self, format: impl Into<String>) -> Self {
        self.multi_word_code_format = format.into();
        self
    }

    pub fn one_char_one_code(mut self, yes: bool) -> Self {
        self.one_char_one_code = yes;
        self
    }

    pub fn mapping_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_table_path = Some(path.into());
        self
    }

    pub fn text_encoding(mut self, label: impl Into<String>) -> Self {
        self.text_encoding = label.into();
        self
    }

    /// 设置多音字展开上限；0 会回退到 1。
    pub fn max_code_combinations(mut self, n: usize) -> Self {
        self.max_code_combinations = n.max(1);
        self
    }

    /// 字段是否出现在行中（词总是出现）。
    pub fn contains(&self, field: Field) -> bool {
        match field {
            Field::Code => self.contains_code,
            Field::Word => true,
            Field::Rank => self.contains_rank,
        }
    }

    /// 出现的字段，按位置升序。
    pub fn present_fields(&self) -> Vec<Field> {
        let present: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|f| self.contains(*f))
            .collect();
        self.field_order.sorted(&present)
    }

    /// 导出的文本能否按行导入回来：行分隔符必须含 `\r` 或 `\n`。
    pub fn line_delimiter_splits_lines(&self) -> bool {
        has_line_break(&self.line_delimiter)
    }

    pub fn has_mapping_table(&self) -> bool {
        self.mapping_table_path
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty())
    }

    /// 检查所有致命的配置错误（导出前必须通过）。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.code_type.requires_mapping_table() && !self.has_mapping_table() {
            return Err(ConfigError::MissingMappingTable {
                code_type: self.code_type,
            });
        }
        self.validate_for_import()
    }

    /// 只导入时的检查：不要求映射表。
    pub fn validate_for_import(&self) -> Result<(), ConfigError> {
        let per_char = self.contains_code && self.one_char_one_code;
        if per_char && self.code_delimiter.is_empty() {
            return Err(ConfigError::EmptyCodeDelimiter);
        }
        self.check_layout()?;
        if per_char {
            if has_line_break(&self.code_delimiter) {
                return Err(ConfigError::LineBreakInDelimiter { name: "编码分隔符" });
            }
            let (code, field) = (&self.code_delimiter, &self.field_delimiter);
            if code.contains(field.as_str()) || field.contains(code.as_str()) {
                return Err(ConfigError::CodeDelimiterClashesWithField {
                    code: code.clone(),
                    field: field.clone(),
                });
            }
        }
        CodeFormat::parse(&self.multi_word_code_format)?;
        Ok(())
    }

    /// 行布局本身的检查：字段分隔符非空，出现的字段位置互不相同。
    pub(crate) fn check_layout(&self) -> Result<(), ConfigError> {
        if self.field_delimiter.is_empty() {
            return Err(ConfigError::EmptyFieldDelimiter);
        }
        if has_line_break(&self.field_delimiter) {
            return Err(ConfigError::LineBreakInDelimiter { name: "字段分隔符" });
        }
        let fields = self.present_fields();
        for pair in fields.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if self.field_order.position(a) == self.field_order.position(b) {
                return Err(ConfigError::DuplicateFieldPosition {
                    first: a,
                    second: b,
                    position: self.field_order.position(a),
                });
            }
        }
        Ok(())
    }
}

pub(crate) fn has_line_break(s: &str) -> bool {
    s.contains(['\r', '\n'])
}
