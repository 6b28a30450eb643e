//! `codec`：按自定义格式导入（文本 -> 词条）与导出（词条 -> 文本）。
//!
//! `LineCodec::prepare` 一次性校验配置、编译模板、绑定映射表；
//! 之后每个词条/每一行独立处理，单个失败只记录在报告里，不影响其余部分。

use crate::error::{
    ConfigError, EntryGenerationFailure, LineErrorKind, LineParseFailure, SkipReason,
};
use crate::generator::CodeGenerator;
use crate::mapping::MappingTable;
use crate::model::{Code, WordLibrary, WordLibraryList};
use crate::pattern::{PatternConfig, has_line_break};
use crate::template::LineTemplate;

static EMPTY_TABLE: MappingTable = MappingTable::new();

/// 导出时编码的来源。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSource {
    /// 词条的编码方案与目标一致，直接使用已有编码
    Reuse,
    /// 方案不一致（或词条没有编码），用映射表重新生成
    Regenerate,
}

/// 导出结果：文本 + 被跳过的词条。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub text: String,
    /// 输出的行数（一个词条可能输出多行）
    pub line_count: usize,
    pub skipped: Vec<EntryGenerationFailure>,
}

/// 导入结果：词条 + 无法解析的行。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub entries: WordLibraryList,
    pub failures: Vec<LineParseFailure>,
}

#[derive(Debug, Clone)]
pub struct LineCodec<'a> {
    config: PatternConfig,
    template: LineTemplate,
    generator: CodeGenerator<'a>,
}

impl<'a> LineCodec<'a> {
    /// 校验配置并编译模板；配置错误在这里一次性返回。
    pub fn prepare(config: PatternConfig, mapping: &'a MappingTable) -> Result<Self, ConfigError> {
        config.validate()?;
        let template = LineTemplate::compile(&config)?;
        let generator = CodeGenerator::new(mapping, &config)?;
        if !config.line_delimiter_splits_lines() {
            tracing::warn!(
                line_delimiter = ?config.line_delimiter,
                "line delimiter has no line break; exported text cannot be imported line by line"
            );
        }
        tracing::debug!(
            code_type = %config.code_type,
            slots = ?template.slots(),
            mapping_keys = mapping.len(),
            "line codec prepared"
        );
        Ok(Self {
            config,
            template,
            generator,
        })
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    pub fn template(&self) -> &LineTemplate {
        &self.template
    }

    pub fn generator(&self) -> &CodeGenerator<'a> {
        &self.generator
    }

    pub fn code_source(&self, entry: &WordLibrary) -> CodeSource {
        if entry.code_type == self.config.code_type && entry.has_code() {
            CodeSource::Reuse
        } else {
            CodeSource::Regenerate
        }
    }

    /// 词条在目标方案下的全部编码字符串（每个对应一行）。
    pub fn resolve_codes(&self, entry: &WordLibrary) -> Vec<String> {
        match self.code_source(entry) {
            CodeSource::Reuse => entry.code.code_strings(
                &self.config.code_delimiter,
                self.config.code_split_mode,
                self.config.max_code_combinations,
            ),
            CodeSource::Regenerate => self.generator.codes_for(&entry.word),
        }
    }

    /// 导出单个词条，得到一行或多行（不含行分隔符）。
    ///
    /// 不包含编码字段时不查编码，每个词条恰好一行。
    /// 写出后无法原样切分回来的词条（值里含分隔符或换行符）整条跳过。
    pub fn export_entry(
        &self,
        index: usize,
        entry: &WordLibrary,
    ) -> Result<Vec<String>, EntryGenerationFailure> {
        let skip = |reason| EntryGenerationFailure {
            index,
            word: entry.word.clone(),
            reason,
        };
        if entry.word.is_empty() {
            return Err(skip(SkipReason::EmptyWord));
        }
        if self.breaks_field(&entry.word)
            || (self.config.contains_rank && self.breaks_field(&entry.rank.to_string()))
        {
            return Err(skip(SkipReason::DelimiterInField));
        }
        if !self.config.contains_code {
            return Ok(vec![self.template.render("", &entry.word, entry.rank)]);
        }
        if self.reused_code_breaks_chars(entry) {
            return Err(skip(SkipReason::DelimiterInCode));
        }
        let codes = self.resolve_codes(entry);
        if codes.is_empty() {
            return Err(skip(SkipReason::NoCode));
        }
        if codes.iter().any(|code| self.breaks_field(code)) {
            return Err(skip(SkipReason::DelimiterInField));
        }
        Ok(codes
            .iter()
            .map(|code| self.template.render(code, &entry.word, entry.rank))
            .collect())
    }

    pub fn export(&self, entries: &[WordLibrary]) -> ExportReport {
        let mut lines: Vec<String> = Vec::new();
        let mut skipped = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            match self.export_entry(index, entry) {
                Ok(mut rendered) => lines.append(&mut rendered),
                Err(failure) => {
                    tracing::debug!(%failure, "entry skipped");
                    skipped.push(failure);
                }
            }
        }
        if !skipped.is_empty() {
            tracing::warn!(
                skipped = skipped.len(),
                total = entries.len(),
                "some entries could not be exported"
            );
        }
        ExportReport {
            text: lines.join(&self.config.line_delimiter),
            line_count: lines.len(),
            skipped,
        }
    }

    /// 按模板解析一行；`line_no` 只用于错误报告。
    pub fn import_line(&self, line_no: usize, line: &str) -> Result<WordLibrary, LineParseFailure> {
        let fail = |reason| LineParseFailure {
            line_no,
            line: line.to_string(),
            reason,
        };
        let fragments = self.template.split(line);
        let word = fragments.word.ok_or_else(|| fail(LineErrorKind::MissingWord))?;
        let rank = match fragments.rank {
            Some(r) => r
                .trim()
                .parse::<u32>()
                .map_err(|_| fail(LineErrorKind::InvalidRank(r.to_string())))?,
            None => 0,
        };
        let mut entry = WordLibrary::new(word, rank);
        entry.code_type = self.config.code_type;
        if let Some(code) = fragments.code {
            entry.code = self.parse_code(code);
        }
        Ok(entry)
    }

    pub fn import(&self, text: &str) -> ImportReport {
        let mut report = ImportReport::default();
        for (line_no, line) in split_lines(text) {
            match self.import_line(line_no, line) {
                Ok(entry) => report.entries.push(entry),
                Err(failure) => {
                    tracing::debug!(%failure, "line skipped");
                    report.failures.push(failure);
                }
            }
        }
        if !report.failures.is_empty() {
            tracing::warn!(
                failed = report.failures.len(),
                imported = report.entries.len(),
                "some lines could not be imported"
            );
        }
        report
    }

    fn breaks_field(&self, value: &str) -> bool {
        value.contains(self.template.delimiter()) || has_line_break(value)
    }

    /// 沿用的逐字编码里某个字的编码含编码分隔符，导入时会被拆成多个字。
    fn reused_code_breaks_chars(&self, entry: &WordLibrary) -> bool {
        if !self.config.one_char_one_code || self.code_source(entry) != CodeSource::Reuse {
            return false;
        }
        let Code::PerChar(chars) = &entry.code else {
            return false;
        };
        let delimiter = self.config.code_delimiter.as_str();
        chars.iter().flatten().any(|c| c.contains(delimiter))
    }

    fn parse_code(&self, code: &str) -> Code {
        if self.config.one_char_one_code {
            Code::per_char(
                code.split(self.config.code_delimiter.as_str())
                    .filter(|c| !c.is_empty()),
            )
        } else {
            Code::whole(code)
        }
    }
}

impl LineCodec<'static> {
    /// 只用于导入的 codec：不要求映射表。
    ///
    /// 映射表为空，导出时同方案的已有编码照常输出，需要重新生成编码的词条会被跳过。
    pub fn for_import(config: PatternConfig) -> Result<Self, ConfigError> {
        config.validate_for_import()?;
        let template = LineTemplate::compile(&config)?;
        let generator = CodeGenerator::new(&EMPTY_TABLE, &config)?;
        Ok(Self {
            config,
            template,
            generator,
        })
    }
}

/// 按 `\r` 或 `\n` 切行并丢弃空行；行号按 `\n` 计数（从 1 开始）。
fn split_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split('\n')
        .enumerate()
        .flat_map(|(i, l)| l.split('\r').map(move |s| (i + 1, s)))
        .filter(|(_, s)| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CodeType;
    use crate::pattern::{CodeSplitMode, Field, FieldOrder};

    fn table() -> MappingTable {
        MappingTable::parse_str("爱 ai\n你 ni\n我 wo\n行 xing hang\n")
    }

    #[test]
    fn split_lines_handles_all_terminators() {
        let lines: Vec<_> = split_lines("a\r\nb\rc\n\nd").collect();
        assert_eq!(lines, vec![(1, "a"), (2, "b"), (2, "c"), (4, "d")]);
    }

    #[test]
    fn prepare_fails_fast_without_custom_table() {
        let table = MappingTable::new();
        let err = LineCodec::prepare(PatternConfig::new(CodeType::Wubi), &table).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingMappingTable {
                code_type: CodeType::Wubi
            }
        );
    }

    #[test]
    fn import_only_codec_needs_no_table() {
        let config = PatternConfig::new(CodeType::Wubi).contains_rank(false);
        let codec = LineCodec::for_import(config).unwrap();
        let report = codec.import("ep\t爱\n");
        assert_eq!(report.entries[0].code, Code::per_char(["ep"]));
        assert_eq!(report.entries[0].code_type, CodeType::Wubi);
        // 已有编码可以原样导出，但无法重新生成
        let exported = codec.export(&[report.entries[0].clone(), WordLibrary::new("你", 0)]);
        assert_eq!(exported.text, "ep\t爱");
        assert_eq!(exported.skipped.len(), 1);
    }

    #[test]
    fn code_source_depends_on_scheme_and_presence() {
        let table = table();
        let codec = LineCodec::prepare(PatternConfig::default(), &table).unwrap();
        let pinyin = WordLibrary::new("爱", 1).with_code(CodeType::Pinyin, Code::per_char(["ai"]));
        let wubi = WordLibrary::new("爱", 1).with_code(CodeType::Wubi, Code::whole("ep"));
        let bare = WordLibrary::new("爱", 1);
        assert_eq!(codec.code_source(&pinyin), CodeSource::Reuse);
        assert_eq!(codec.code_source(&wubi), CodeSource::Regenerate);
        assert_eq!(codec.code_source(&bare), CodeSource::Regenerate);
        assert_eq!(codec.resolve_codes(&wubi), vec!["ai"]);
    }

    #[test]
    fn reused_codes_keep_their_spelling() {
        let table = table();
        let codec = LineCodec::prepare(PatternConfig::default(), &table).unwrap();
        // 映射表里是 xing/hang，但同方案的已有编码优先
        let entry = WordLibrary::new("行", 2).with_code(CodeType::Pinyin, Code::per_char(["heng"]));
        assert_eq!(codec.export_entry(0, &entry), Ok(vec!["heng\t行\t2".to_string()]));
    }

    #[test]
    fn polyphone_entry_exports_one_line_per_code() {
        let table = table();
        let config = PatternConfig::default().contains_rank(false).field_delimiter(" ");
        let codec = LineCodec::prepare(config, &table).unwrap();
        let report = codec.export(&[WordLibrary::new("行", 0)]);
        assert_eq!(report.text, "xing 行\nhang 行");
        assert_eq!(report.line_count, 2);
    }

    #[test]
    fn export_without_code_field_never_looks_up_codes() {
        let table = MappingTable::new();
        let config = PatternConfig::default().contains_code(false);
        let codec = LineCodec::prepare(config, &table).unwrap();
        let report = codec.export(&[WordLibrary::new("生僻", 7)]);
        assert_eq!(report.text, "生僻\t7");
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn word_containing_field_delimiter_is_skipped() {
        let table = table();
        let config = PatternConfig::default()
            .layout(&[Field::Word])
            .unwrap()
            .field_delimiter(" ");
        let codec = LineCodec::prepare(config, &table).unwrap();
        let report = codec.export(&[WordLibrary::new("hello world", 0), WordLibrary::new("爱", 0)]);
        assert_eq!(report.text, "爱");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::DelimiterInField);
        assert_eq!(report.skipped[0].word, "hello world");
    }

    #[test]
    fn line_breaks_in_values_are_skipped() {
        let table = table();
        let codec = LineCodec::prepare(PatternConfig::default(), &table).unwrap();
        let broken_word = WordLibrary::new("爱\n你", 1);
        let broken_code =
            WordLibrary::new("爱", 1).with_code(CodeType::Pinyin, Code::whole("ai\r"));
        for entry in [broken_word, broken_code] {
            let err = codec.export_entry(0, &entry).unwrap_err();
            assert_eq!(err.reason, SkipReason::DelimiterInField, "{entry:?}");
        }
    }

    #[test]
    fn reused_code_with_code_delimiter_is_skipped() {
        let table = table();
        let codec = LineCodec::prepare(PatternConfig::default(), &table).unwrap();
        let entry =
            WordLibrary::new("爱你", 1).with_code(CodeType::Pinyin, Code::per_char(["a'i", "ni"]));
        let err = codec.export_entry(3, &entry).unwrap_err();
        assert_eq!(err.reason, SkipReason::DelimiterInCode);
        assert_eq!(err.index, 3);
        // 整词编码不按编码分隔符切分
        let codec = LineCodec::prepare(PatternConfig::default().one_char_one_code(false), &table)
            .unwrap();
        let entry = WordLibrary::new("爱", 1).with_code(CodeType::Pinyin, Code::whole("a'i"));
        assert_eq!(codec.export_entry(0, &entry), Ok(vec!["a'i\t爱\t1".to_string()]));
    }

    #[test]
    fn empty_word_is_skipped() {
        let table = table();
        let codec = LineCodec::prepare(PatternConfig::default(), &table).unwrap();
        let report = codec.export(&[WordLibrary::new("", 0), WordLibrary::new("我", 1)]);
        assert_eq!(report.text, "wo\t我\t1");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::EmptyWord);
        assert_eq!(report.skipped[0].index, 0);
    }

    #[test]
    fn import_splits_per_char_codes() {
        let table = table();
        let config = PatternConfig::default().code_split_mode(CodeSplitMode::Both);
        let codec = LineCodec::prepare(config, &table).unwrap();
        let entry = codec.import_line(1, "'ai'ni'\t爱你\t9").unwrap();
        assert_eq!(entry.word, "爱你");
        assert_eq!(entry.rank, 9);
        assert_eq!(entry.code_type, CodeType::Pinyin);
        assert_eq!(entry.code, Code::per_char(["ai", "ni"]));
    }

    #[test]
    fn import_keeps_whole_word_code() {
        let table = MappingTable::new();
        let config = PatternConfig::new(CodeType::UserDefine)
            .mapping_table("table.txt")
            .one_char_one_code(false);
        let codec = LineCodec::prepare(config, &table).unwrap();
        let entry = codec.import_line(1, "ep'q\t爱\t1").unwrap();
        assert_eq!(entry.code, Code::whole("ep'q"));
        assert_eq!(entry.code_type, CodeType::UserDefine);
    }

    #[test]
    fn bad_rank_fails_only_that_line() {
        let table = table();
        let codec = LineCodec::prepare(PatternConfig::default(), &table).unwrap();
        let report = codec.import("ai\t爱\t1\nni\t你\tmany\r\nwo\t我\t-3\nwo\t我\t2\n");
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].line_no, 2);
        assert_eq!(
            report.failures[0].reason,
            LineErrorKind::InvalidRank("many".to_string())
        );
        assert_eq!(report.failures[1].line_no, 3);
    }

    #[test]
    fn missing_word_fragment_fails_the_line() {
        let table = table();
        let config = PatternConfig::default().field_order(FieldOrder::new(0, 2, 1));
        let codec = LineCodec::prepare(config, &table).unwrap();
        let err = codec.import_line(4, "ai\t5").unwrap_err();
        assert_eq!(err.reason, LineErrorKind::MissingWord);
        assert_eq!(err.line_no, 4);
    }

    #[test]
    fn short_line_keeps_default_rank() {
        let table = table();
        let codec = LineCodec::prepare(PatternConfig::default(), &table).unwrap();
        let entry = codec.import_line(1, "ai\t爱").unwrap();
        assert_eq!(entry.rank, 0);
    }
}
