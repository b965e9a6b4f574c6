//! 多语系序列化标题
//!
//! 题库标题以 `a:5:{s:4:"Big5";s:<n>:"...";...}` 的形式存放五个语系槽位，
//! 长度前缀是值的 UTF-8 字节数。

use crate::error::EncodingError;

/// 语系槽位（固定顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    /// 繁体显示标题（唯一有业务意义的槽位）
    Big5,
    GB2312,
    En,
    EucJp,
    UserDefine,
}

impl Locale {
    /// 序列化时的固定顺序
    pub const ALL: [Locale; 5] = [
        Locale::Big5,
        Locale::GB2312,
        Locale::En,
        Locale::EucJp,
        Locale::UserDefine,
    ];

    /// 序列化中使用的键名
    pub fn key(self) -> &'static str {
        match self {
            Locale::Big5 => "Big5",
            Locale::GB2312 => "GB2312",
            Locale::En => "en",
            Locale::EucJp => "EUC-JP",
            Locale::UserDefine => "user_define",
        }
    }

    /// 重新编码时写入的占位值
    pub fn placeholder(self) -> &'static str {
        match self {
            Locale::GB2312 => "COPY_COPY_undefined",
            _ => "",
        }
    }
}

/// 五个语系槽位的序列化记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedRecord {
    values: [String; 5],
    /// 解码时 Big5 槽位声明的长度
    declared_big5_len: Option<usize>,
}

impl SerializedRecord {
    /// 以规范占位值构造，只保留 Big5 内容
    pub fn canonical(big5: impl Into<String>) -> Self {
        let mut values = Locale::ALL.map(|locale| locale.placeholder().to_string());
        values[0] = big5.into();
        Self {
            values,
            declared_big5_len: None,
        }
    }

    /// 由解码结果构造
    pub(crate) fn from_decoded(values: [String; 5], declared_big5_len: usize) -> Self {
        Self {
            values,
            declared_big5_len: Some(declared_big5_len),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        &self.values[locale as usize]
    }

    /// Big5 显示标题
    pub fn big5(&self) -> &str {
        self.get(Locale::Big5)
    }

    /// 按固定顺序遍历 (语系, 值)
    pub fn slots(&self) -> impl Iterator<Item = (Locale, &str)> {
        Locale::ALL
            .iter()
            .zip(self.values.iter())
            .map(|(locale, value)| (*locale, value.as_str()))
    }

    /// 检查解码时声明的 Big5 长度是否等于 UTF-8 字节长度
    pub fn verify_length(&self) -> Result<(), EncodingError> {
        match self.declared_big5_len {
            Some(declared) if declared != self.big5().len() => Err(EncodingError::LengthMismatch {
                declared,
                actual: self.big5().len(),
            }),
            _ => Ok(()),
        }
    }
}
