use crate::models::{Mode, Plan, Summary};
use anyhow::Result;
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// 预览时最多显示的索引行数
const PREVIEW_ROWS: usize = 5;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
/// - `mode`: 运行模式
pub fn init_log_file(log_file_path: &Path, mode: Mode) -> Result<()> {
    let log_header = format!(
        "{}\n{}日志 - {}\n{}\n\n",
        "=".repeat(60),
        mode,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 将逐个文件的结果追加到日志文件
pub fn append_summary(log_file_path: &Path, summary: &Summary) -> Result<()> {
    let mut file = OpenOptions::new().append(true).open(log_file_path)?;
    for outcome in &summary.outcomes {
        writeln!(
            file,
            "[{}] {} - {}",
            outcome.status,
            outcome.path.display(),
            outcome.detail
        )?;
    }
    writeln!(
        file,
        "\n处理 {}, 成功 {}, 跳过 {}, 失败 {}",
        summary.processed, summary.changed, summary.skipped, summary.errored
    )?;
    if let Some(path) = &summary.index_path {
        writeln!(file, "索引表: {}", path.display())?;
    }
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `root`: 选中的根目录
/// - `mode`: 运行模式
pub fn log_startup(root: &Path, mode: Mode) {
    info!("{}", "=".repeat(60));
    info!("🚀 XML 文件处理工具 - {}", mode);
    info!("📁 选择的文件夹: {}", root.display());
    info!("{}", "=".repeat(60));
}

/// 记录计划预览
pub fn log_plan_preview(plan: &Plan) {
    match plan.mode {
        Mode::BuildIndex => {
            info!("\n正在处理 {} 个文件...", plan.entries.len());
            info!("📋 预览前{}笔资料:", PREVIEW_ROWS);
            for record in plan.records.iter().take(PREVIEW_ROWS) {
                info!(
                    "  {} | {} | {}",
                    record.group,
                    record.filename,
                    truncate_text(&record.title, 40)
                );
            }
        }
        _ => {
            info!(
                "\n找到 {} 个文件，预计{}:",
                plan.entries.len(),
                plan.mode
            );
            for entry in &plan.entries {
                info!("  - {}", entry.describe());
            }
        }
    }
    info!("💡 待执行 {} 项", plan.pending());
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &Summary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", summary.changed, summary.processed);
    info!("⏭️ 跳过: {}", summary.skipped);
    info!("❌ 失败: {}", summary.errored);
    if let Some(path) = &summary.index_path {
        info!("📄 索引表: {}", path.display());
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileOutcome, OutcomeStatus};
    use std::path::PathBuf;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("第一章", 5), "第一章");
        assert_eq!(truncate_text("第一章總複習", 3), "第一章...");
    }

    #[test]
    fn test_audit_log_contains_every_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("run.log");
        let summary = Summary::from_outcomes(
            Mode::Rename,
            vec![
                FileOutcome::new(PathBuf::from("G/a.xml"), OutcomeStatus::Renamed, "a.xml -> G_a.xml"),
                FileOutcome::new(PathBuf::from("b.xml"), OutcomeStatus::Skipped, "不在子文件夹中"),
            ],
            None,
        );

        init_log_file(&log, Mode::Rename).unwrap();
        append_summary(&log, &summary).unwrap();

        let content = fs::read_to_string(&log).unwrap();
        assert!(content.contains("重新命名文件日志"));
        assert!(content.contains("[已重命名] G/a.xml - a.xml -> G_a.xml"));
        assert!(content.contains("[跳过] b.xml - 不在子文件夹中"));
        assert!(content.contains("处理 2, 成功 1, 跳过 1, 失败 0"));
    }
}
