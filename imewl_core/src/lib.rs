//! `imewl_core`：自定义词库格式的纯逻辑层，不做任何文件 I/O。
//!
//! 设计目标：
//! - **一次编译，多次复用**：`PatternConfig` -> `LineTemplate` / `CodeGenerator` 只在 `prepare` 时构建
//! - **导入导出对称**：同一配置下导出的行，导入后得到相同的词、词频与编码
//! - **单条失败不影响整批**：无法生成编码的词条、无法解析的行只记录，不中断
//!
//! 流水线：`PatternConfig` -> `LineCodec::prepare` -> `export` / `import`
pub mod codec;
pub mod error;
pub mod generator;
pub mod mapping;
pub mod model;
pub mod pattern;
pub mod template;

pub use codec::{CodeSource, ExportReport, ImportReport, LineCodec};
pub use error::{ConfigError, EntryGenerationFailure, LineErrorKind, LineParseFailure, SkipReason};
pub use generator::{CodeFormat, CodeGenerator};
pub use mapping::MappingTable;
pub use model::{Code, CodeType, WordLibrary, WordLibraryList};
pub use pattern::{CodeSplitMode, Field, FieldOrder, PatternConfig};
pub use template::{Fragments, LineTemplate};
