use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use imewl_core::{CodeSplitMode, CodeType, Field};

#[derive(Parser)]
#[command(author, version, about = "自定义格式词库的导入导出", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// 按一种自定义格式读入词库，再按另一种自定义格式写出。
    Convert {
        /// 输入词库文件
        #[arg(short, long)]
        input: PathBuf,
        /// 输出词库文件
        #[arg(short, long)]
        output: PathBuf,
        /// 输入的字段布局，例如 `code,word,rank`
        #[arg(long, default_value = "code,word,rank", value_parser = parse_layout)]
        from_layout: Layout,
        /// 输入的字段分隔符（支持 \t \s 转义）
        #[arg(long, default_value = "\\t", value_parser = parse_escaped)]
        from_delimiter: String,
        /// 输入编码所属的方案
        #[arg(long, default_value = "pinyin")]
        from_type: CodeType,
        /// 输入文件的文本编码
        #[arg(long, default_value = "utf-8")]
        from_encoding: String,
        /// 输出的字段布局
        #[arg(long, default_value = "code,word,rank", value_parser = parse_layout)]
        to_layout: Layout,
        /// 输出的字段分隔符
        #[arg(long, default_value = "\\t", value_parser = parse_escaped)]
        to_delimiter: String,
        /// 输出文件的文本编码
        #[arg(long, default_value = "utf-8")]
        to_encoding: String,
        /// 输出的行分隔符
        #[arg(long, default_value = "\\n", value_parser = parse_escaped)]
        line_delimiter: String,
        #[command(flatten)]
        coding: CodingArgs,
    },
    /// 打印词在目标方案下生成的编码。
    Codes {
        /// 要生成编码的词
        #[arg(required = true)]
        words: Vec<String>,
        #[command(flatten)]
        coding: CodingArgs,
    },
}

/// 目标编码方案与编码生成相关的参数（输入与输出共用分隔方式）。
#[derive(Args)]
pub struct CodingArgs {
    /// 目标编码方案（pinyin / wubi / zhengma / cangjie / user）
    #[arg(short = 't', long, default_value = "pinyin")]
    pub code_type: CodeType,
    /// 字符编码映射表文件（非拼音方案必填）
    #[arg(long)]
    pub table: Option<PathBuf>,
    /// 映射表文件的文本编码
    #[arg(long, default_value = "utf-8")]
    pub table_encoding: String,
    /// 逐字编码之间的分隔符
    #[arg(long, default_value = "'", value_parser = parse_escaped)]
    pub code_delimiter: String,
    /// 分隔符的位置（infix / prefix / suffix / both）
    #[arg(long, default_value = "infix")]
    pub split_mode: CodeSplitMode,
    /// 整个词作为一个键查编码，而不是每个字一个编码
    #[arg(long)]
    pub whole_word: bool,
    /// 多字词编码格式，例如 `{0}{1}`
    #[arg(long, default_value = "")]
    pub format: String,
    /// 多音字展开时每个词最多生成的编码数
    #[arg(long, default_value_t = 64)]
    pub max_combinations: usize,
}

#[derive(Debug, Clone)]
pub struct Layout(pub Vec<Field>);

fn parse_layout(s: &str) -> Result<Layout, String> {
    s.split([',', ' '])
        .filter(|f| !f.is_empty())
        .map(|f| f.parse::<Field>().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()
        .map(Layout)
}

/// 命令行里不方便直接写制表符等字符：`\t` `\s` `\n` `\r` `\\`。
pub fn parse_escaped(s: &str) -> Result<String, String> {
    let mut out = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => return Err(format!("unknown escape `\\{other}`")),
            None => return Err("dangling `\\`".to_string()),
        }
    }
    Ok(out)
}
