//! 中文数字转换 - 业务能力层
//!
//! 只用于生成排序键，结果从不写回文件。
//!
//! 转换分四步，顺序不能调换：
//! 1. `十X`（前面不是数字）→ `1X`，覆盖 11–19
//! 2. `X十[Y]` → `X0` / `XY`，覆盖 20–99
//! 3. 剩余的 `十` → `10`
//! 4. 剩余的单个数字逐字替换

use lazy_static::lazy_static;
use phf::phf_map;
use regex::{Captures, Regex};

/// 单个中文数字到阿拉伯数字（大写与小写对应同一数字）
static CHINESE_DIGITS: phf::Map<char, char> = phf_map! {
    '零' => '0', '〇' => '0',
    '一' => '1', '壹' => '1',
    '二' => '2', '貳' => '2',
    '三' => '3', '參' => '3',
    '四' => '4', '肆' => '4',
    '五' => '5', '伍' => '5',
    '六' => '6', '陸' => '6',
    '七' => '7', '柒' => '7',
    '八' => '8', '捌' => '8',
    '九' => '9', '玖' => '9',
};

lazy_static! {
    static ref TENS: Regex =
        Regex::new("([一二三四五六七八九壹貳參肆伍陸柒捌玖])[十拾]([一二三四五六七八九壹貳參肆伍陸柒捌玖]?)")
            .unwrap();
}

fn is_ten(c: char) -> bool {
    c == '十' || c == '拾'
}

/// 一到九（不含零），可以作为十位或个位
fn unit_digit(c: char) -> Option<char> {
    CHINESE_DIGITS.get(&c).copied().filter(|d| *d != '0')
}

/// 将文本中的中文数字转换为阿拉伯数字
pub fn normalize(text: &str) -> String {
    let result = expand_teens(text);
    let result = expand_tens(&result);
    let result = expand_bare_ten(&result);
    replace_digits(&result)
}

/// 第一步：`十一` → `11`
///
/// 前面紧跟数字的 `十` 属于 `X十Y`，留给第二步。
pub fn expand_teens(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut prev_is_unit = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if is_ten(c) && !prev_is_unit {
            if let Some(d) = chars.get(i + 1).and_then(|&next| unit_digit(next)) {
                out.push('1');
                out.push(d);
                prev_is_unit = false;
                i += 2;
                continue;
            }
        }
        prev_is_unit = unit_digit(c).is_some();
        out.push(c);
        i += 1;
    }

    out
}

/// 第二步：`二十三` → `23`，`二十` → `20`
pub fn expand_tens(text: &str) -> String {
    TENS.replace_all(text, |caps: &Captures| {
        let tens = caps[1].chars().next().and_then(unit_digit).unwrap_or('0');
        let ones = caps[2].chars().next().and_then(unit_digit).unwrap_or('0');
        format!("{}{}", tens, ones)
    })
    .into_owned()
}

/// 第三步：单独的 `十` → `10`
pub fn expand_bare_ten(text: &str) -> String {
    text.replace(['十', '拾'], "10")
}

/// 第四步：逐字替换剩余数字
pub fn replace_digits(text: &str) -> String {
    text.chars()
        .map(|c| CHINESE_DIGITS.get(&c).copied().unwrap_or(c))
        .collect()
}
