//! 序列化标题编解码 - 业务能力层
//!
//! 只负责 `a:5:{...}` 字符串与 [`SerializedRecord`] 之间的转换，不关心文件

use crate::error::EncodingError;
use crate::models::{Locale, SerializedRecord};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `s:4:"Big5";s:<n>:"<value>"`
    static ref BIG5_SLOT: Regex = slot_pattern(Locale::Big5);
    static ref OTHER_SLOTS: [Regex; 4] = [
        slot_pattern(Locale::GB2312),
        slot_pattern(Locale::En),
        slot_pattern(Locale::EucJp),
        slot_pattern(Locale::UserDefine),
    ];
}

fn slot_pattern(locale: Locale) -> Regex {
    let key = locale.key();
    let pattern = format!(
        r#"s:{}:"{}";s:([0-9]+):"([^"]*)""#,
        key.len(),
        regex::escape(key)
    );
    Regex::new(&pattern).unwrap()
}

/// 解析序列化标题
///
/// # 返回
/// 找不到 Big5 槽位时返回 None，由调用方视为"无法解析"
pub fn decode(text: &str) -> Option<SerializedRecord> {
    let caps = BIG5_SLOT.captures(text)?;
    // 数字过大时视为无法解析
    let declared: usize = caps[1].parse().ok()?;

    let mut values: [String; 5] = Default::default();
    values[0] = caps[2].to_string();
    for (slot, re) in values[1..].iter_mut().zip(OTHER_SLOTS.iter()) {
        if let Some(c) = re.captures(text) {
            *slot = c[2].to_string();
        }
    }

    Some(SerializedRecord::from_decoded(values, declared))
}

/// 生成规范的序列化标题，其余四个槽位写入固定占位值
pub fn encode(big5_value: &str) -> String {
    encode_record(&SerializedRecord::canonical(big5_value))
}

/// 按固定顺序序列化全部槽位
pub fn encode_record(record: &SerializedRecord) -> String {
    let body: String = record
        .slots()
        .map(|(locale, value)| {
            format!(
                r#"s:{}:"{}";s:{}:"{}";"#,
                locale.key().len(),
                locale.key(),
                value.len(),
                value
            )
        })
        .collect();
    format!("a:{}:{{{}}}", Locale::ALL.len(), body)
}

/// 检查值能否被编码后再解析回来
pub fn check_encodable(value: &str) -> Result<(), EncodingError> {
    if value.contains('"') {
        return Err(EncodingError::QuoteInValue {
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"a:5:{s:4:"Big5";s:9:"第一章";s:6:"GB2312";s:6:"第一章";s:2:"en";s:9:"Chapter 1";s:6:"EUC-JP";s:0:"";s:11:"user_define";s:0:"";}"#;

    #[test]
    fn test_encode_exact_envelope() {
        assert_eq!(
            encode("第一章"),
            r#"a:5:{s:4:"Big5";s:9:"第一章";s:6:"GB2312";s:19:"COPY_COPY_undefined";s:2:"en";s:0:"";s:6:"EUC-JP";s:0:"";s:11:"user_define";s:0:"";}"#
        );
    }

    #[test]
    fn test_encode_length_is_utf8_bytes() {
        let encoded = encode("第一章");
        assert!(encoded.contains(r#"s:9:"第一章""#));
        assert_eq!(encode("").split(';').nth(1), Some(r#"s:0:"""#));
    }

    #[test]
    fn test_decode_all_slots() {
        let record = decode(SAMPLE).unwrap();
        assert_eq!(record.big5(), "第一章");
        assert_eq!(record.get(Locale::GB2312), "第一章");
        assert_eq!(record.get(Locale::En), "Chapter 1");
        assert_eq!(record.get(Locale::UserDefine), "");
        assert!(record.verify_length().is_ok());
    }

    #[test]
    fn test_decode_missing_pattern() {
        assert!(decode("").is_none());
        assert!(decode("第一章").is_none());
        assert!(decode(r#"a:5:{s:6:"GB2312";s:3:"abc";}"#).is_none());
    }

    #[test]
    fn test_decode_encode_roundtrip_big5() {
        for title in ["", "G_第一課", "Unit 3 (review)", "第十二章：總複習"] {
            assert_eq!(decode(&encode(title)).unwrap().big5(), title);
        }
    }

    #[test]
    fn test_decode_reports_char_count_length() {
        let text = r#"a:5:{s:4:"Big5";s:3:"第一章";}"#;
        let record = decode(text).unwrap();
        assert_eq!(record.big5(), "第一章");
        assert!(record.verify_length().is_err());
    }

    #[test]
    fn test_check_encodable() {
        assert!(check_encodable("G_第一章").is_ok());
        assert!(check_encodable(r#"G_"引號""#).is_err());
    }
}
