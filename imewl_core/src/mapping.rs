use std::collections::BTreeMap;

/// 字（或整词）到编码的映射表。
///
/// 一次会话只加载一次，之后只读；调用方以引用方式共享。
///
/// 文本格式（简化版）：
///
/// - `key<空白>code [code ...]`，多个编码也可以用 `,` 分隔
/// - 同一个 key 可以出现在多行，编码按首次出现顺序累加并去重
/// - 允许 `#` 开头注释行；没有编码的行会被跳过
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    map: BTreeMap<String, Vec<String>>,
}

impl MappingTable {
    pub const fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// 追加一个编码；已存在的编码不会重复加入。
    pub fn insert(&mut self, key: impl Into<String>, code: impl Into<String>) {
        let code = code.into();
        let codes = self.map.entry(key.into()).or_default();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    pub fn parse_str(s: &str) -> Self {
        let mut table = Self::new();
        let mut skipped = 0usize;
        let s = s.strip_prefix('\u{feff}').unwrap_or(s);
        for (idx, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let Some(key) = tokens.next() else { continue };
            let codes: Vec<&str> = tokens
                .flat_map(|t| t.split(','))
                .filter(|c| !c.is_empty())
                .collect();
            if codes.is_empty() {
                tracing::debug!(line = idx + 1, content = line, "mapping line has no code, skipped");
                skipped += 1;
                continue;
            }
            for code in codes {
                table.insert(key, code);
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, keys = table.len(), "skipped malformed mapping lines");
        }
        table
    }

    /// 查询 key 对应的全部编码。
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.map.get(key).map(Vec::as_slice).filter(|c| !c.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K, V> FromIterator<(K, V)> for MappingTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}
