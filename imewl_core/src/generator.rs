//! `generator`：根据映射表为词生成编码。
//!
//! 两种组合方式：
//! - 逐字（`one_char_one_code = true`）：每个字单独查表，任一字查不到则整体失败；
//!   多音字按笛卡尔积展开，每个组合得到一个完整编码
//! - 整词（`one_char_one_code = false`）：整个词作为一个 key 查表，不做模糊匹配

use crate::error::ConfigError;
use crate::mapping::MappingTable;
use crate::model::{cartesian, combination_count};
use crate::pattern::{CodeSplitMode, PatternConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormatPart {
    Literal(String),
    /// 第 n 个字的编码（从 0 开始）
    Char(usize),
}

/// 多字词编码格式，例如 `{0}{1}`、`{0}-{1}-{2}`。
///
/// `{{` / `}}` 表示字面量花括号；超出词长的占位符输出为空。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeFormat {
    parts: Vec<FormatPart>,
}

impl CodeFormat {
    pub fn parse(format: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidCodeFormat {
            format: format.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = format.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(d) if d.is_ascii_digit() => digits.push(d),
                            Some(_) => return Err(invalid("占位符只能是数字序号")),
                            None => return Err(invalid("占位符没有闭合")),
                        }
                    }
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| invalid("占位符缺少序号"))?;
                    if !literal.is_empty() {
                        parts.push(FormatPart::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(FormatPart::Char(index));
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(invalid("多余的 `}`")),
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            parts.push(FormatPart::Literal(literal));
        }
        Ok(Self { parts })
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// 按字的顺序把各字编码代入格式。
    pub fn render(&self, codes: &[&str]) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                FormatPart::Literal(s) => out.push_str(s),
                FormatPart::Char(i) => {
                    if let Some(code) = codes.get(*i) {
                        out.push_str(code);
                    }
                }
            }
        }
        out
    }
}

/// 编码生成器：持有映射表引用，生成结果只取决于 (词, 映射表, 配置)。
#[derive(Debug, Clone)]
pub struct CodeGenerator<'a> {
    mapping: &'a MappingTable,
    one_char_one_code: bool,
    code_delimiter: String,
    split_mode: CodeSplitMode,
    format: CodeFormat,
    max_combinations: usize,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(mapping: &'a MappingTable, config: &PatternConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            mapping,
            one_char_one_code: config.one_char_one_code,
            code_delimiter: config.code_delimiter.clone(),
            split_mode: config.code_split_mode,
            format: CodeFormat::parse(&config.multi_word_code_format)?,
            max_combinations: config.max_code_combinations.max(1),
        })
    }

    pub fn mapping(&self) -> &MappingTable {
        self.mapping
    }

    /// 逐字查表；任一字查不到时返回 `None`。
    pub fn char_codes(&self, word: &str) -> Option<Vec<Vec<String>>> {
        let mut buf = [0u8; 4];
        word.chars()
            .map(|ch| {
                self.mapping
                    .get(ch.encode_utf8(&mut buf))
                    .map(<[String]>::to_vec)
            })
            .collect()
    }

    /// 为词生成编码；查不到时返回空（不是错误）。
    pub fn codes_for(&self, word: &str) -> Vec<String> {
        if word.is_empty() {
            return Vec::new();
        }
        if !self.one_char_one_code {
            return self
                .mapping
                .get(word)
                .map(|codes| codes.iter().take(self.max_combinations).cloned().collect())
                .unwrap_or_default();
        }
        match self.char_codes(word) {
            Some(chars) => self.combine(word, &chars),
            None => {
                tracing::debug!(word, "some character has no code in mapping table");
                Vec::new()
            }
        }
    }

    fn combine(&self, word: &str, chars: &[Vec<String>]) -> Vec<String> {
        let total = combination_count(chars);
        if total > self.max_combinations {
            tracing::warn!(
                word,
                total,
                limit = self.max_combinations,
                "too many code combinations, truncated"
            );
        }
        let mut out: Vec<String> = Vec::new();
        for combo in cartesian(chars, self.max_combinations) {
            let code = if self.format.is_empty() {
                self.split_mode.join(&combo, &self.code_delimiter)
            } else {
                self.format.render(&combo)
            };
            if !out.contains(&code) {
                out.push(code);
            }
        }
        out
    }
}
