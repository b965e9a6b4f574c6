//! 单个文件处理流程 - 流程层
//!
//! 核心职责：定义"一个文件"的完整处理流程
//!
//! ```text
//! READ → PARSE → {SKIP | EXTRACT} → {SKIP | REWRITE} → WRITE
//! ```
//!
//! 计划阶段（`plan_*`）只读不写；`commit_entry` 只在整批计划确认后调用。

use crate::error::{ParseError, WriteError};
use crate::infrastructure::TitleDocument;
use crate::models::{Action, OutcomeStatus, PlanEntry, SkipReason, SourceFile};
use crate::services::title_codec;
use std::fs;
use tracing::{debug, info};

/// 标题处理的决定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleDecision {
    /// 跳过，文档保持不变
    Skip(SkipReason),
    /// 改写为新的序列化标题
    Rewrite {
        /// 当前 Big5 标题
        current: String,
        /// 加上前缀后的 Big5 标题
        new_title: String,
        /// 重新编码后的完整序列化字符串
        serialized: String,
    },
}

/// 加上 `<group>_` 前缀；已带前缀时返回 AlreadyPrefixed
pub fn apply_prefix(value: &str, group: &str) -> Result<String, SkipReason> {
    let prefix = format!("{}_", group);
    if value.starts_with(&prefix) {
        return Err(SkipReason::AlreadyPrefixed);
    }
    Ok(format!("{}{}", prefix, value))
}

/// 根据已解析的文档决定如何处理标题（EXTRACT → SKIP | REWRITE）
pub fn decide_title(doc: &TitleDocument, group: Option<&str>) -> TitleDecision {
    let Some(group) = group else {
        return TitleDecision::Skip(SkipReason::NoGroup);
    };

    let Some(raw) = doc.find_title() else {
        return TitleDecision::Skip(SkipReason::MissingTitle);
    };

    let Some(record) = title_codec::decode(raw) else {
        return TitleDecision::Skip(SkipReason::UnparseableTitle);
    };

    if let Err(e) = record.verify_length() {
        return TitleDecision::Skip(SkipReason::EncodingMismatch(e.to_string()));
    }

    let current = record.big5().to_string();
    let new_title = match apply_prefix(&current, group) {
        Ok(t) => t,
        Err(reason) => return TitleDecision::Skip(reason),
    };

    if let Err(e) = title_codec::check_encodable(&new_title) {
        return TitleDecision::Skip(SkipReason::UnencodableTitle(e.to_string()));
    }

    let serialized = title_codec::encode(&new_title);
    TitleDecision::Rewrite {
        current,
        new_title,
        serialized,
    }
}

/// 在内存中对文档执行决定（REWRITE 阶段），不写盘
///
/// 跳过时文档保持不变
pub fn apply_title(doc: &mut TitleDocument, group: Option<&str>) -> Result<TitleDecision, ParseError> {
    let decision = decide_title(doc, group);
    if let TitleDecision::Rewrite { serialized, .. } = &decision {
        if !doc.set_title(serialized)? {
            return Ok(TitleDecision::Skip(SkipReason::MissingTitle));
        }
    }
    Ok(decision)
}

/// 计划更新标题（READ → PARSE → 决定）
pub fn plan_title(file: &SourceFile) -> PlanEntry {
    if file.group.is_none() {
        return PlanEntry::skip(file.clone(), SkipReason::NoGroup, None);
    }

    let doc = match TitleDocument::open(&file.path) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("{} 解析失败: {}", file, e);
            return PlanEntry::skip(file.clone(), SkipReason::ParseFailed(e.to_string()), None);
        }
    };

    match decide_title(&doc, file.group.as_deref()) {
        TitleDecision::Skip(reason) => {
            let current = doc
                .find_title()
                .and_then(title_codec::decode)
                .map(|r| r.big5().to_string());
            PlanEntry::skip(file.clone(), reason, current)
        }
        TitleDecision::Rewrite {
            current,
            new_title,
            serialized,
        } => PlanEntry::rewrite(file.clone(), current, new_title, serialized),
    }
}

/// 计划重命名：规则与标题相同，作用于文件名
pub fn plan_rename(file: &SourceFile) -> PlanEntry {
    let name = file.file_name();
    let Some(group) = file.group.as_deref() else {
        return PlanEntry::skip(file.clone(), SkipReason::NoGroup, Some(name));
    };

    let new_name = match apply_prefix(&name, group) {
        Ok(n) => n,
        Err(reason) => return PlanEntry::skip(file.clone(), reason, Some(name)),
    };

    if file.path.with_file_name(&new_name).exists() {
        return PlanEntry::skip(file.clone(), SkipReason::TargetExists, Some(name));
    }

    PlanEntry::rename(file.clone(), new_name)
}

/// 提取 Big5 标题（索引模式，不修改文件）
///
/// 找不到或无法解析标题时返回空字符串
pub fn extract_title(file: &SourceFile) -> Result<String, ParseError> {
    let doc = TitleDocument::open(&file.path)?;
    let title = doc
        .find_title()
        .and_then(title_codec::decode)
        .map(|record| {
            if let Err(e) = record.verify_length() {
                debug!("{} {}", file, e);
            }
            record.big5().to_string()
        })
        .unwrap_or_default();
    Ok(title)
}

/// 执行计划中的一项（WRITE 阶段）
///
/// # 返回
/// 返回该文件的最终状态；写入失败时返回错误，由调用方计数
pub fn commit_entry(entry: &PlanEntry) -> Result<OutcomeStatus, WriteError> {
    let file = &entry.file;
    let Some(new_value) = entry.new_value.as_deref() else {
        return Ok(OutcomeStatus::Skipped);
    };

    match entry.action {
        Action::Rename => {
            let target = file.path.with_file_name(new_value);
            if target.exists() {
                return Err(WriteError::TargetExists {
                    path: target.display().to_string(),
                });
            }
            fs::rename(&file.path, &target).map_err(|source| WriteError::RenameFailed {
                from: file.path.display().to_string(),
                to: target.display().to_string(),
                source,
            })?;
            info!("{} 重新命名: {} -> {}", file, file.file_name(), new_value);
            Ok(OutcomeStatus::Renamed)
        }
        Action::Rewrite => {
            let mut doc = TitleDocument::open(&file.path)?;
            if !doc.set_title(new_value)? {
                return Err(WriteError::TitleVanished {
                    path: file.path.display().to_string(),
                });
            }
            doc.save()?;
            info!("{} 更新标题: {}", file, entry.display_value.as_deref().unwrap_or_default());
            Ok(OutcomeStatus::Rewritten)
        }
        Action::Skip | Action::Extract => Ok(OutcomeStatus::Skipped),
    }
}
