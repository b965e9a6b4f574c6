//! 文件处理上下文
//!
//! 封装"我正在处理哪个分组的第几个文件"这一信息

use std::fmt::Display;
use std::path::{Path, PathBuf};

/// 发现阶段得到的单个文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// 文件完整路径
    pub path: PathBuf,

    /// 相对根目录的路径
    pub relative: PathBuf,

    /// 所属分组（根目录下的第一层文件夹名），根目录中的文件为 None
    pub group: Option<String>,

    /// 发现顺序（从1开始）
    pub ordinal: usize,
}

impl SourceFile {
    /// 创建新的文件上下文
    pub fn new(path: PathBuf, relative: PathBuf, group: Option<String>, ordinal: usize) -> Self {
        Self {
            path,
            relative,
            group,
            ordinal,
        }
    }

    /// 文件名（不含目录）
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

impl Display for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[文件 #{} 分组 {}] {}",
            self.ordinal,
            self.group.as_deref().unwrap_or("-"),
            self.relative.display()
        )
    }
}
