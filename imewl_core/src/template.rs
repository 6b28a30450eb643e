//! `template`：由 `PatternConfig` 编译出的行模板。
//!
//! 模板是一组按位置升序排列的字段槽位。导出时按槽位顺序拼行，
//! 导入时第 i 个片段归属第 i 个槽位的字段；两边共用同一份槽位，保证对称。

use crate::error::ConfigError;
use crate::pattern::{Field, PatternConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTemplate {
    slots: Vec<Field>,
    delimiter: String,
}

/// 一行切分后各字段对应的片段（缺失的为 `None`）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fragments<'a> {
    pub code: Option<&'a str>,
    pub word: Option<&'a str>,
    pub rank: Option<&'a str>,
    /// 超出槽位数量、被忽略的片段数
    pub surplus: usize,
}

impl LineTemplate {
    pub fn compile(config: &PatternConfig) -> Result<Self, ConfigError> {
        config.check_layout()?;
        Ok(Self {
            slots: config.present_fields(),
            delimiter: config.field_delimiter.clone(),
        })
    }

    pub fn slots(&self) -> &[Field] {
        &self.slots
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// 用 (code, word, rank) 填充模板，得到一行（不含行分隔符）。
    pub fn render(&self, code: &str, word: &str, rank: u32) -> String {
        let mut line = String::new();
        for (i, field) in self.slots.iter().enumerate() {
            if i > 0 {
                line.push_str(&self.delimiter);
            }
            match field {
                Field::Code => line.push_str(code),
                Field::Word => line.push_str(word),
                Field::Rank => line.push_str(&rank.to_string()),
            }
        }
        line
    }

    /// 按字段分隔符切分一行（丢弃空片段），再按槽位顺序分配给字段。
    pub fn split<'a>(&self, line: &'a str) -> Fragments<'a> {
        let mut out = Fragments::default();
        let mut pieces = line.split(self.delimiter.as_str()).filter(|p| !p.is_empty());
        for field in &self.slots {
            let Some(piece) = pieces.next() else { break };
            match field {
                Field::Code => out.code = Some(piece),
                Field::Word => out.word = Some(piece),
                Field::Rank => out.rank = Some(piece),
            }
        }
        out.surplus = pieces.count();
        out
    }
}
