use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::pattern::CodeSplitMode;

/// 编码方案：决定一个词的编码如何得到。
///
/// 词条的编码只在其所属的编码方案下有意义；方案不同时导出必须重新生成编码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodeType {
    /// 拼音（内置映射表）
    #[default]
    Pinyin,
    Wubi,
    Zhengma,
    Cangjie,
    /// 用户自定义编码（必须提供映射表文件）
    UserDefine,
}

impl CodeType {
    pub const ALL: [CodeType; 5] = [
        CodeType::Pinyin,
        CodeType::Wubi,
        CodeType::Zhengma,
        CodeType::Cangjie,
        CodeType::UserDefine,
    ];

    /// 是否需要外部映射表（只有拼音有内置表）。
    pub fn requires_mapping_table(self) -> bool {
        !matches!(self, CodeType::Pinyin)
    }

    pub fn name(self) -> &'static str {
        match self {
            CodeType::Pinyin => "pinyin",
            CodeType::Wubi => "wubi",
            CodeType::Zhengma => "zhengma",
            CodeType::Cangjie => "cangjie",
            CodeType::UserDefine => "user",
        }
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodeType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "userdefine" | "user-define" | "custom" => return Ok(CodeType::UserDefine),
            _ => {}
        }
        CodeType::ALL
            .into_iter()
            .find(|t| t.name() == lower)
            .ok_or_else(|| ConfigError::UnknownCodeType(s.to_string()))
    }
}

/// 词条的编码。
///
/// - `PerChar`：逐字编码，每个字一组候选编码（多音字有多个候选）
/// - `Whole`：整词编码，每个字符串是一个完整编码，导出时各占一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    PerChar(Vec<Vec<String>>),
    Whole(Vec<String>),
}

impl Default for Code {
    fn default() -> Self {
        Code::Whole(Vec::new())
    }
}

impl Code {
    /// 每个字只有一个编码的逐字编码，例如 `["ai", "ni"]`。
    pub fn per_char<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Code::PerChar(codes.into_iter().map(|c| vec![c.into()]).collect())
    }

    /// 单个整词编码。
    pub fn whole(code: impl Into<String>) -> Self {
        Code::Whole(vec![code.into()])
    }

    /// 没有任何可用编码（逐字编码中任一字没有候选也算空）。
    pub fn is_empty(&self) -> bool {
        match self {
            Code::PerChar(chars) => chars.is_empty() || chars.iter().any(Vec::is_empty),
            Code::Whole(codes) => codes.is_empty(),
        }
    }

    /// 展开成可直接写入编码字段的字符串。
    ///
    /// 逐字编码按笛卡尔积展开（最多 `limit` 个），每个组合用 `delimiter` 按 `mode` 连接。
    pub fn code_strings(&self, delimiter: &str, mode: CodeSplitMode, limit: usize) -> Vec<String> {
        match self {
            Code::PerChar(chars) => {
                if self.is_empty() {
                    return Vec::new();
                }
                cartesian(chars, limit)
                    .iter()
                    .map(|combo| mode.join(combo, delimiter))
                    .collect()
            }
            Code::Whole(codes) => codes.iter().take(limit.max(1)).cloned().collect(),
        }
    }
}

/// 笛卡尔积：第一个位置变化最慢；结果最多 `limit` 个，超出部分按顺序截掉。
pub(crate) fn cartesian(lists: &[Vec<String>], limit: usize) -> Vec<Vec<&str>> {
    let limit = limit.max(1);
    let mut out: Vec<Vec<&str>> = vec![Vec::new()];
    for candidates in lists {
        let mut next = Vec::with_capacity(out.len().saturating_mul(candidates.len()).min(limit));
        'fill: for prefix in &out {
            for c in candidates {
                if next.len() >= limit {
                    break 'fill;
                }
                let mut combo = prefix.clone();
                combo.push(c.as_str());
                next.push(combo);
            }
        }
        out = next;
    }
    out
}

/// 笛卡尔积的完整规模（溢出时饱和）。
pub(crate) fn combination_count(lists: &[Vec<String>]) -> usize {
    lists
        .iter()
        .fold(1usize, |acc, c| acc.saturating_mul(c.len()))
}

/// 词库中的一个词条。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordLibrary {
    /// 词（非空）
    pub word: String,
    /// 词频，默认 0
    pub rank: u32,
    /// `code` 所属的编码方案
    pub code_type: CodeType,
    pub code: Code,
}

impl WordLibrary {
    pub fn new(word: impl Into<String>, rank: u32) -> Self {
        Self {
            word: word.into(),
            rank,
            code_type: CodeType::default(),
            code: Code::default(),
        }
    }

    pub fn with_code(mut self, code_type: CodeType, code: Code) -> Self {
        self.set_code(code_type, code);
        self
    }

    pub fn set_code(&mut self, code_type: CodeType, code: Code) {
        self.code_type = code_type;
        self.code = code;
    }

    pub fn has_code(&self) -> bool {
        !self.code.is_empty()
    }
}

/// 词库：按输入顺序排列，不要求词或编码唯一。
pub type WordLibraryList = Vec<WordLibrary>;

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(v: &[&[&str]]) -> Vec<Vec<String>> {
        v.iter()
            .map(|c| c.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn code_type_parses_names_and_aliases() {
        assert_eq!("pinyin".parse::<CodeType>(), Ok(CodeType::Pinyin));
        assert_eq!("Wubi".parse::<CodeType>(), Ok(CodeType::Wubi));
        assert_eq!("custom".parse::<CodeType>(), Ok(CodeType::UserDefine));
        assert_eq!(
            "shape".parse::<CodeType>(),
            Err(ConfigError::UnknownCodeType("shape".to_string()))
        );
        for t in CodeType::ALL {
            assert_eq!(t.to_string().parse::<CodeType>(), Ok(t));
        }
    }

    #[test]
    fn only_pinyin_has_a_builtin_table() {
        assert!(!CodeType::Pinyin.requires_mapping_table());
        assert!(CodeType::UserDefine.requires_mapping_table());
        assert!(CodeType::Wubi.requires_mapping_table());
    }

    #[test]
    fn cartesian_keeps_character_order() {
        let l = lists(&[&["chang", "zhang"], &["da"]]);
        assert_eq!(cartesian(&l, 16), vec![vec!["chang", "da"], vec!["zhang", "da"]]);
        assert_eq!(combination_count(&l), 2);
    }

    #[test]
    fn cartesian_truncates_at_limit() {
        let l = lists(&[&["a", "b"], &["c", "d"], &["e", "f"]]);
        let out = cartesian(&l, 3);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], vec!["a", "c", "e"]);
        assert_eq!(out[2], vec!["a", "d", "e"]);
        assert_eq!(combination_count(&l), 8);
    }

    #[test]
    fn per_char_code_with_a_missing_character_is_empty() {
        let code = Code::PerChar(lists(&[&["ai"], &[]]));
        assert!(code.is_empty());
        assert!(code.code_strings("'", CodeSplitMode::Infix, 8).is_empty());
    }

    #[test]
    fn code_strings_join_each_combination() {
        let code = Code::PerChar(lists(&[&["xing", "hang"], &["ren"]]));
        assert_eq!(
            code.code_strings("'", CodeSplitMode::Infix, 8),
            vec!["xing'ren", "hang'ren"]
        );
        assert_eq!(
            Code::whole("aini").code_strings("'", CodeSplitMode::Both, 8),
            vec!["aini"]
        );
    }

    #[test]
    fn new_entry_has_no_code() {
        let wl = WordLibrary::new("爱", 3);
        assert!(!wl.has_code());
        let wl = wl.with_code(CodeType::Pinyin, Code::per_char(["ai"]));
        assert!(wl.has_code());
        assert_eq!(wl.code, Code::PerChar(vec![vec!["ai".to_string()]]));
    }
}
