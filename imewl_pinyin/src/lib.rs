//! 拼音（pinyin）：内置的 字 -> 拼音 映射表。
//!
//! 常用字来自随二进制编译进来的数据文件，多音字的常用读音在前；
//! 数据文件里没有的汉字（基本区与各扩展区）再用 `pinyin` crate 的多音字数据补全。

use imewl_core::MappingTable;
use pinyin::ToPinyinMulti;

/// 内置映射表原始数据（与自定义映射表文件同一种格式）。
pub const PINYIN_DATA: &str = include_str!("../data/pinyin.txt");

/// 需要补全读音的汉字区段。
const HAN_RANGES: [(u32, u32); 4] = [
    (0x3400, 0x4DBF),
    (0x4E00, 0x9FFF),
    (0xF900, 0xFAFF),
    (0x20000, 0x323AF),
];

/// 构建内置拼音映射表。
///
/// 数据文件里已有的字以数据文件为准，不再追加读音。
/// 每次调用都会重新构建；一次会话只需调用一次，之后按引用共享。
pub fn pinyin_table() -> MappingTable {
    let mut table = MappingTable::parse_str(PINYIN_DATA);
    let mut buf = [0u8; 4];
    let han = HAN_RANGES
        .iter()
        .flat_map(|&(lo, hi)| (lo..=hi).filter_map(char::from_u32));
    for ch in han {
        let key: &str = ch.encode_utf8(&mut buf);
        if table.contains(key) {
            continue;
        }
        let Some(readings) = ch.to_pinyin_multi() else {
            continue;
        };
        for reading in readings {
            if let Some(code) = plain_code(reading.plain()) {
                table.insert(key, code);
            }
        }
    }
    table
}

/// 无调拼音，`ü` 写作 `v`；含其他非 ASCII 字母的读音（如 `ê`）不收。
fn plain_code(plain: &str) -> Option<String> {
    let code = plain.replace('ü', "v");
    (!code.is_empty() && code.bytes().all(|b| b.is_ascii_lowercase())).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imewl_core::{CodeGenerator, PatternConfig};

    #[test]
    fn common_characters_are_present() {
        let table = pinyin_table();
        assert_eq!(table.get("爱"), Some(&["ai".to_string()][..]));
        assert_eq!(table.get("你"), Some(&["ni".to_string()][..]));
        assert_eq!(table.get("中"), Some(&["zhong".to_string()][..]));
    }

    #[test]
    fn covers_the_whole_han_block() {
        let table = pinyin_table();
        assert!(table.len() > 20_000, "{}", table.len());
        let sample = "的一是不了人我在有他这中大来上国个到说们为子和你地出道也时年得就那要下以生会\
                      自着去之过家学对可她里后小么心多天而能好都然没日于起还发成事只作当想看文无开\
                      手十用主行方又如前所本见经头面公同三已老从动两长知民样现分将外但身些与高意进\
                      把法此实回二理美点月明其种声全工己话儿者向情部正名定女问力机给等几很业最间新\
                      什打便位因重被走电四第门相次东政海口使教西再平真听世气信北少关并内加化由却代\
                      总斯输入脑计算键盘鼠标软件硬网络";
        let missing: String = sample
            .chars()
            .filter(|c| !table.contains(c.encode_utf8(&mut [0u8; 4])))
            .collect();
        assert!(missing.is_empty(), "missing: {missing}");
    }

    #[test]
    fn everyday_words_get_codes() {
        let table = pinyin_table();
        let config = PatternConfig::default();
        let generator = CodeGenerator::new(&table, &config).unwrap();
        for (word, code) in [
            ("电脑", "dian'nao"),
            ("计算机", "ji'suan'ji"),
            ("输入法", "shu'ru'fa"),
            ("于是", "yu'shi"),
        ] {
            let codes = generator.codes_for(word);
            assert!(codes.iter().any(|c| c == code), "{word}: {codes:?}");
        }
    }

    #[test]
    fn polyphones_keep_the_common_reading_first() {
        let table = pinyin_table();
        let codes = table.get("行").unwrap();
        assert_eq!(codes[0], "xing");
        assert!(codes.iter().any(|c| c == "hang"));
        assert_eq!(table.get("长").unwrap()[0], "chang");
    }

    #[test]
    fn umlaut_is_written_as_v() {
        assert_eq!(plain_code("lü").as_deref(), Some("lv"));
        assert_eq!(plain_code("nv").as_deref(), Some("nv"));
        assert_eq!(plain_code("ê"), None);
        assert_eq!(plain_code(""), None);
    }

    #[test]
    fn codes_are_toneless_lowercase() {
        for (key, codes) in pinyin_table().iter() {
            assert_eq!(key.chars().count(), 1, "{key}");
            for code in codes {
                assert!(
                    !code.is_empty() && code.bytes().all(|b| b.is_ascii_lowercase()),
                    "{key} -> {code}"
                );
            }
        }
    }
}
