//! 待办索引构建 - 编排层
//!
//! 逐个文件提取标题（不修改任何文件），再按"中文数字转换 → 自然排序"排列。
//! 排序是稳定的：排序键相同的记录保持发现顺序。

use crate::models::{IndexRecord, PlanEntry, SkipReason, SourceFile};
use crate::services::numeral_normalizer::normalize;
use crate::services::NaturalKey;
use crate::workflow::title_mutator::extract_title;
use tracing::{info, warn};

/// 索引提取结果
#[derive(Debug, Default)]
pub struct IndexExtraction {
    /// 已排序的记录
    pub records: Vec<IndexRecord>,
    /// 每个文件一项：Extract 或 Skip(解析错误)
    pub entries: Vec<PlanEntry>,
}

/// 提取所有文件的标题并排序
pub fn build_index(files: &[SourceFile]) -> IndexExtraction {
    let mut extraction = IndexExtraction::default();

    for file in files {
        match extract_title(file) {
            Ok(title) => {
                extraction.records.push(IndexRecord::new(
                    file.group.clone().unwrap_or_default(),
                    file.file_name(),
                    title.clone(),
                ));
                extraction.entries.push(PlanEntry::extract(file.clone(), title));
            }
            Err(e) => {
                warn!("{} ⚠️ 读取失败: {}", file, e);
                extraction.entries.push(PlanEntry::skip(
                    file.clone(),
                    SkipReason::ParseFailed(e.to_string()),
                    None,
                ));
            }
        }
    }

    sort_records(&mut extraction.records);
    info!("✓ 已按标题名称进行自然排序（包含中文数字转换）");
    extraction
}

/// 按标题自然排序（稳定）
pub fn sort_records(records: &mut [IndexRecord]) {
    records.sort_by_cached_key(|record| NaturalKey::new(&normalize(&record.title)));
}
