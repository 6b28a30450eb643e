//! `imewl`：自定义格式词库转换工具。

mod cli;

use clap::Parser;
use cli::{Cli, CodingArgs, Command, Layout};
use eyre::WrapErr;
use imewl_core::{Field, LineCodec, MappingTable, PatternConfig};
use imewl_dict::{build_mapping_table, export_file, import_file};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Convert {
            input,
            output,
            from_layout,
            from_delimiter,
            from_type,
            from_encoding,
            to_layout,
            to_delimiter,
            to_encoding,
            line_delimiter,
            coding,
        } => {
            let from = coding
                .pattern(&from_layout)?
                .code_type(from_type)
                .field_delimiter(from_delimiter)
                .text_encoding(from_encoding);
            let to = coding
                .pattern(&to_layout)?
                .field_delimiter(to_delimiter)
                .line_delimiter(line_delimiter)
                .text_encoding(to_encoding);
            convert(&input, &output, from, to, &coding)?;
        }
        Command::Codes { words, coding } => {
            let config = coding.pattern(&Layout(vec![Field::Code, Field::Word]))?;
            let table = load_table(&coding)?;
            let codec = LineCodec::prepare(config, &table)?;
            for word in &words {
                let codes = codec.generator().codes_for(word);
                if codes.is_empty() {
                    println!("{word}\t(无编码)");
                } else {
                    println!("{word}\t{}", codes.join(" "));
                }
            }
        }
    }

    Ok(())
}

impl CodingArgs {
    /// 由命令行参数得到目标方案下的配置（字段布局另给）。
    fn pattern(&self, layout: &Layout) -> eyre::Result<PatternConfig> {
        let mut config = PatternConfig::new(self.code_type)
            .layout(&layout.0)?
            .code_delimiter(self.code_delimiter.clone())
            .code_split_mode(self.split_mode)
            .one_char_one_code(!self.whole_word)
            .multi_word_code_format(self.format.clone())
            .max_code_combinations(self.max_combinations);
        if let Some(table) = &self.table {
            config = config.mapping_table(table);
        }
        Ok(config)
    }
}

fn load_table(coding: &CodingArgs) -> eyre::Result<MappingTable> {
    tracing::info!(code_type = %coding.code_type, "loading mapping table");
    build_mapping_table(coding.code_type, coding.table.as_deref(), &coding.table_encoding)
        .wrap_err("Failed to build the mapping table")
}

fn convert(
    input: &Path,
    output: &Path,
    from: PatternConfig,
    to: PatternConfig,
    coding: &CodingArgs,
) -> eyre::Result<()> {
    // 先检查输出配置，避免读完输入才发现缺映射表
    to.validate()?;
    let table = load_table(coding)?;
    let from = LineCodec::for_import(from)?;
    let to = LineCodec::prepare(to, &table)?;

    tracing::info!(path = %input.display(), "importing");
    let imported = import_file(&from, input)
        .wrap_err_with(|| format!("Failed to import '{}'", input.display()))?;
    for failure in &imported.failures {
        tracing::warn!("{failure}");
    }

    tracing::info!(path = %output.display(), entries = imported.entries.len(), "exporting");
    let report = export_file(&to, &imported.entries, output)
        .wrap_err_with(|| format!("Failed to export '{}'", output.display()))?;
    for skipped in &report.skipped {
        tracing::warn!("{skipped}");
    }

    tracing::info!(
        imported = imported.entries.len(),
        failed_lines = imported.failures.len(),
        written_lines = report.line_count,
        skipped_entries = report.skipped.len(),
        "done"
    );
    Ok(())
}
