//! 执行计划与结果汇总
//!
//! `plan` 阶段只产生 [`Plan`]，`commit` 阶段消费它并返回 [`Summary`]。
//! 两者生成后都不再修改。

use crate::models::{IndexRecord, SourceFile};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// 运行模式（每次调用三选一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// 重命名文件
    Rename,
    /// 更新题库标题
    UpdateTitle,
    /// 创建待办索引
    BuildIndex,
}

impl Mode {
    /// 用于日志文件名的短名称
    pub fn slug(self) -> &'static str {
        match self {
            Mode::Rename => "rename",
            Mode::UpdateTitle => "update_title",
            Mode::BuildIndex => "build_index",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Rename => write!(f, "重新命名文件"),
            Mode::UpdateTitle => write!(f, "更新题库标题"),
            Mode::BuildIndex => write!(f, "创建待办列表"),
        }
    }
}

/// 单个文件的计划动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Skip,
    Rename,
    Rewrite,
    /// 仅提取标题（索引模式）
    Extract,
}

/// 跳过原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum SkipReason {
    /// 文件不在分组文件夹中
    NoGroup,
    /// 找不到标题元素或标题为空
    MissingTitle,
    /// 标题不符合序列化格式
    UnparseableTitle,
    /// 已带有分组前缀
    AlreadyPrefixed,
    /// 声明长度与字节长度不一致
    EncodingMismatch(String),
    /// 新标题无法编码
    UnencodableTitle(String),
    /// 重命名目标已存在
    TargetExists,
    /// 文件读取或 XML 解析失败
    ParseFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoGroup => write!(f, "不在子文件夹中"),
            SkipReason::MissingTitle => write!(f, "找不到标题"),
            SkipReason::UnparseableTitle => write!(f, "无法解析标题"),
            SkipReason::AlreadyPrefixed => write!(f, "已有前缀"),
            SkipReason::EncodingMismatch(msg) => write!(f, "编码不一致: {}", msg),
            SkipReason::UnencodableTitle(msg) => write!(f, "无法编码: {}", msg),
            SkipReason::TargetExists => write!(f, "目标文件已存在"),
            SkipReason::ParseFailed(msg) => write!(f, "解析错误: {}", msg),
        }
    }
}

/// 计划中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub file: SourceFile,
    pub action: Action,
    pub reason: Option<SkipReason>,
    /// 当前值（文件名或 Big5 标题）
    pub current: Option<String>,
    /// 计算出的新值：新文件名，或重新编码后的完整序列化标题
    pub new_value: Option<String>,
    /// 新值的可读形式（新文件名或新 Big5 标题）
    pub display_value: Option<String>,
}

impl PlanEntry {
    pub fn skip(file: SourceFile, reason: SkipReason, current: Option<String>) -> Self {
        Self {
            file,
            action: Action::Skip,
            reason: Some(reason),
            current,
            new_value: None,
            display_value: None,
        }
    }

    pub fn rename(file: SourceFile, new_name: String) -> Self {
        let current = Some(file.file_name());
        Self {
            file,
            action: Action::Rename,
            reason: None,
            current,
            new_value: Some(new_name.clone()),
            display_value: Some(new_name),
        }
    }

    pub fn rewrite(file: SourceFile, current: String, new_title: String, serialized: String) -> Self {
        Self {
            file,
            action: Action::Rewrite,
            reason: None,
            current: Some(current),
            new_value: Some(serialized),
            display_value: Some(new_title),
        }
    }

    pub fn extract(file: SourceFile, title: String) -> Self {
        Self {
            file,
            action: Action::Extract,
            reason: None,
            current: Some(title),
            new_value: None,
            display_value: None,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.action == Action::Skip
    }

    /// 预览行，例如 `a.xml -> G_a.xml` 或 `a.xml -> 跳过 (已有前缀)`
    pub fn describe(&self) -> String {
        let name = self.file.file_name();
        match (&self.action, &self.reason) {
            (Action::Skip, Some(reason)) => format!("{} -> 跳过 ({})", name, reason),
            (Action::Rename, _) => format!(
                "{} -> {}",
                name,
                self.display_value.as_deref().unwrap_or_default()
            ),
            (Action::Rewrite, _) => format!(
                "{} -> {} -> {}",
                name,
                self.current.as_deref().unwrap_or_default(),
                self.display_value.as_deref().unwrap_or_default()
            ),
            _ => format!(
                "{} -> {}",
                name,
                self.current.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// 完整的执行计划
#[derive(Debug, Clone)]
pub struct Plan {
    pub mode: Mode,
    pub root: PathBuf,
    pub entries: Vec<PlanEntry>,
    /// 索引模式下已排序的记录
    pub records: Vec<IndexRecord>,
    /// 索引表输出目录
    pub output_dir: PathBuf,
}

impl Plan {
    /// 需要执行写入的项数
    pub fn pending(&self) -> usize {
        match self.mode {
            Mode::BuildIndex => self.records.len(),
            _ => self.entries.iter().filter(|e| !e.is_skip()).count(),
        }
    }

    /// 计划阶段的预览汇总（尚未写入任何内容）
    pub fn summary(&self) -> Summary {
        let outcomes = self
            .entries
            .iter()
            .map(|entry| {
                let status = if entry.is_skip() {
                    OutcomeStatus::Skipped
                } else {
                    OutcomeStatus::Planned
                };
                FileOutcome::new(entry.file.path.clone(), status, entry.describe())
            })
            .collect();
        Summary::from_outcomes(self.mode, outcomes, None)
    }
}

/// 单个文件的最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Skipped,
    Planned,
    Renamed,
    Rewritten,
    Indexed,
    Failed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutcomeStatus::Skipped => "跳过",
            OutcomeStatus::Planned => "待执行",
            OutcomeStatus::Renamed => "已重命名",
            OutcomeStatus::Rewritten => "已更新",
            OutcomeStatus::Indexed => "已索引",
            OutcomeStatus::Failed => "失败",
        };
        f.write_str(label)
    }
}

/// 单个文件的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: OutcomeStatus,
    pub detail: String,
}

impl FileOutcome {
    pub fn new(path: PathBuf, status: OutcomeStatus, detail: impl Into<String>) -> Self {
        Self {
            path,
            status,
            detail: detail.into(),
        }
    }
}

/// 运行结果汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub mode: Mode,
    pub processed: usize,
    pub skipped: usize,
    /// 重命名 / 更新 / 写入索引的数量
    pub changed: usize,
    pub errored: usize,
    pub outcomes: Vec<FileOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_path: Option<PathBuf>,
}

impl Summary {
    /// 由逐个文件的结果统计出汇总
    pub fn from_outcomes(mode: Mode, outcomes: Vec<FileOutcome>, index_path: Option<PathBuf>) -> Self {
        let count = |status: OutcomeStatus| outcomes.iter().filter(|o| o.status == status).count();
        let changed = count(OutcomeStatus::Renamed)
            + count(OutcomeStatus::Rewritten)
            + count(OutcomeStatus::Indexed);
        Self {
            mode,
            processed: outcomes.len(),
            skipped: count(OutcomeStatus::Skipped),
            changed,
            errored: count(OutcomeStatus::Failed),
            outcomes,
            index_path,
        }
    }
}
