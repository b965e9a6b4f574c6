//! 题库 XML 文档 - 基础设施层
//!
//! 只暴露"找标题 / 改标题"两种能力，标题元素固定绑定到 WisdomMaster 命名空间。
//! 其余内容按原样输出。

use crate::error::{ParseError, WriteError};
use encoding_rs::{Encoding, UTF_8};
use lazy_static::lazy_static;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Writer};
use std::fs;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 查找 XML 声明时读取的字节数
const DECL_SCAN_LIMIT: usize = 256;

lazy_static! {
    static ref DECLARED_ENCODING: Regex =
        Regex::new(r#"^\s*<\?xml[^>]*?encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#).unwrap();
}

/// 标题元素所在的命名空间
pub const WISDOM_MASTER_NS: &str = "http://www.sun.net.tw/WisdomMaster";

/// 标题元素的本地名称
pub const TITLE_LOCAL_NAME: &str = "title";

/// 题库 XML 文档
///
/// 职责：
/// - 读入并校验整个文档
/// - 定位第一个 `{WisdomMaster}title` 元素
/// - 替换其文本后重新输出（带 XML 声明）
#[derive(Debug, Clone)]
pub struct TitleDocument {
    path: PathBuf,
    source: String,
    title: Option<String>,
}

impl TitleDocument {
    /// 读取并解析文件
    ///
    /// 按 BOM 或 XML 声明中的 encoding 解码（如 Big5），写回时统一为 UTF-8
    pub fn open(path: &Path) -> Result<Self, ParseError> {
        let bytes =
            fs::read(path).map_err(|e| ParseError::read_failed(path.display().to_string(), e))?;
        let source = decode_source(path, &bytes)?;
        Self::parse(path, source)
    }

    /// 解析内存中的文档
    pub fn parse(path: impl Into<PathBuf>, source: impl Into<String>) -> Result<Self, ParseError> {
        let path = path.into();
        let source = source.into();
        let source = source.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(source);
        let title = scan_title(&path, &source)?;
        Ok(Self {
            path,
            source,
            title,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 标题文本；元素不存在或为空时返回 None
    pub fn find_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// 替换标题文本
    ///
    /// # 返回
    /// 文档中没有标题元素时返回 false，文档不变
    pub fn set_title(&mut self, value: &str) -> Result<bool, ParseError> {
        match rewrite_title(&self.path, &self.source, value)? {
            Some(rendered) => {
                self.source = rendered;
                self.title = Some(value.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 当前文档内容
    pub fn to_xml(&self) -> &str {
        &self.source
    }

    /// 写回原路径
    pub fn save(&self) -> Result<(), WriteError> {
        fs::write(&self.path, self.source.as_bytes())
            .map_err(|e| WriteError::save_failed(self.path.display().to_string(), e))
    }
}

/// 将原始字节解码为文本
///
/// 优先使用 BOM，其次是 XML 声明，都没有时按 UTF-8 处理
fn decode_source(path: &Path, bytes: &[u8]) -> Result<String, ParseError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes).unwrap_or(UTF_8), bytes),
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(ParseError::Undecodable {
            path: path.display().to_string(),
            encoding: encoding.name().to_string(),
        });
    }
    if encoding != UTF_8 {
        debug!("{} 按 {} 解码", path.display(), encoding.name());
    }
    Ok(text.into_owned())
}

/// XML 声明中的 encoding 属性
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(DECL_SCAN_LIMIT)]);
    let caps = DECLARED_ENCODING.captures(&head)?;
    Encoding::for_label(caps[1].as_bytes())
}

fn is_title(ns: &ResolveResult, local_name: &[u8]) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == WISDOM_MASTER_NS.as_bytes())
        && local_name == TITLE_LOCAL_NAME.as_bytes()
}

fn malformed(path: &Path, position: usize, source: impl Into<quick_xml::Error>) -> ParseError {
    ParseError::MalformedXml {
        path: path.display().to_string(),
        position,
        source: source.into(),
    }
}

/// 遍历整个文档，返回第一个标题元素的文本
///
/// 元素存在但没有文本时返回 `Some("")`
fn scan_title(path: &Path, source: &str) -> Result<Option<String>, ParseError> {
    let mut reader = NsReader::from_str(source);
    let mut title: Option<String> = None;
    // 正在读取的标题元素的嵌套深度
    let mut depth = 0usize;
    let mut done = false;

    loop {
        let position = reader.buffer_position();
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| malformed(path, position, e))?;

        match event {
            Event::Start(ref e) => {
                if depth > 0 {
                    depth += 1;
                } else if !done && is_title(&ns, e.local_name().as_ref()) {
                    depth = 1;
                    title = Some(String::new());
                }
            }
            Event::Empty(ref e) => {
                if depth == 0 && !done && is_title(&ns, e.local_name().as_ref()) {
                    title = Some(String::new());
                    done = true;
                }
            }
            Event::End(_) => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        done = true;
                    }
                }
            }
            Event::Text(ref e) if depth == 1 => {
                let text = e.unescape().map_err(|err| malformed(path, position, err))?;
                if let Some(t) = title.as_mut() {
                    t.push_str(&text);
                }
            }
            Event::CData(ref e) if depth == 1 => {
                if let Some(t) = title.as_mut() {
                    t.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(title)
}

/// 输出替换标题后的文档；没有标题元素时返回 None
fn rewrite_title(path: &Path, source: &str, value: &str) -> Result<Option<String>, ParseError> {
    let mut reader = NsReader::from_str(source);
    let mut writer = Writer::new(Vec::new());
    let write_err = |e| malformed(path, 0, e);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(write_err)?;

    let mut depth = 0usize;
    let mut replaced = false;
    let mut first_event = true;

    loop {
        let position = reader.buffer_position();
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| malformed(path, position, e))?;

        // 原有声明由上面的新声明代替，紧随其后的换行保留
        if let Event::Decl(_) = event {
            first_event = false;
            continue;
        }
        if first_event {
            first_event = false;
            writer
                .write_event(Event::Text(BytesText::from_escaped("\n")))
                .map_err(write_err)?;
        }

        match event {
            Event::Start(ref e) if depth == 0 && !replaced && is_title(&ns, e.local_name().as_ref()) => {
                writer.write_event(Event::Start(e.clone())).map_err(write_err)?;
                writer
                    .write_event(Event::Text(BytesText::from_escaped(partial_escape(value))))
                    .map_err(write_err)?;
                depth = 1;
            }
            Event::Empty(ref e) if depth == 0 && !replaced && is_title(&ns, e.local_name().as_ref()) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                writer.write_event(Event::Start(e.clone())).map_err(write_err)?;
                writer
                    .write_event(Event::Text(BytesText::from_escaped(partial_escape(value))))
                    .map_err(write_err)?;
                writer
                    .write_event(Event::End(BytesEnd::new(name)))
                    .map_err(write_err)?;
                replaced = true;
            }
            Event::Start(_) if depth > 0 => depth += 1,
            Event::End(ref e) if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    writer.write_event(Event::End(e.clone())).map_err(write_err)?;
                    replaced = true;
                }
            }
            // 旧标题内容全部丢弃
            _ if depth > 0 => {}
            Event::Eof => break,
            other => writer.write_event(other).map_err(write_err)?,
        }
    }

    if !replaced {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&writer.into_inner()).into_owned()))
}
