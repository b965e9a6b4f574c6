//! 自然排序
//!
//! 把字符串切成数字段和非数字段：数字段按数值比较（任意长度），
//! 非数字段按码位比较，较短的前缀排在前面。

use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;

lazy_static! {
    /// 只把 ASCII 数字当作数字段
    static ref NATURAL_SORT_REGEX: Regex = Regex::new(r"[0-9]+|[^0-9]+").unwrap();
}

/// 字符串中的一段
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// 去掉前导零后的数字
    Number(String),
    Text(String),
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // 无前导零时，位数多的数值大；位数相同时逐位比较即可
            (Segment::Number(a), Segment::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            // 同一位置上数字排在文字前面
            (Segment::Number(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 可缓存的自然排序键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Segment>);

impl NaturalKey {
    pub fn new(s: &str) -> Self {
        let segments = NATURAL_SORT_REGEX
            .find_iter(s)
            .map(|mat| {
                let segment = mat.as_str();
                if segment.as_bytes()[0].is_ascii_digit() {
                    let trimmed = segment.trim_start_matches('0');
                    Segment::Number(trimmed.to_string())
                } else {
                    Segment::Text(segment.to_string())
                }
            })
            .collect();
        NaturalKey(segments)
    }
}

/// 自然顺序比较两个字符串
///
/// # Example
/// ```
/// use exam_title_tool::services::natural_order::compare;
/// let mut titles = vec!["第10課", "第2課", "第1課"];
/// titles.sort_by(|a, b| compare(a, b));
/// assert_eq!(titles, vec!["第1課", "第2課", "第10課"]);
/// ```
pub fn compare(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}
