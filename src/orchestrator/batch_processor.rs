//! 批量处理器 - 编排层
//!
//! ## 职责
//!
//! 对外只提供两个入口：
//!
//! 1. [`plan`]：发现文件、逐个决定动作，不做任何修改
//! 2. [`commit`]：执行已确认的计划，单个文件失败只计数，不中断整批
//!
//! 确认步骤由调用方（命令行）负责，[`App::run`] 通过回调把计划交给它。

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::discover_files;
use crate::models::{FileOutcome, Mode, OutcomeStatus, Plan, Summary};
use crate::orchestrator::index_builder::build_index;
use crate::services::IndexWriter;
use crate::utils::logging;
use crate::workflow::title_mutator::{commit_entry, plan_rename, plan_title};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 一次运行的参数
#[derive(Debug, Clone)]
pub struct RunParams {
    /// 选中的根目录，其下第一层文件夹为分组
    pub root: PathBuf,
    pub mode: Mode,
    /// 允许的扩展名（小写，不含点），为空时接受全部
    pub extensions: Vec<String>,
    /// 索引表输出目录
    pub output_dir: PathBuf,
}

impl RunParams {
    /// 根目录为 `<base_dir>/<folder>`
    pub fn from_config(config: &Config, folder: &str, mode: Mode) -> Self {
        Self {
            root: config.base_dir.join(folder),
            mode,
            extensions: config.extensions.clone(),
            output_dir: config.output_dir.clone(),
        }
    }
}

/// 生成执行计划（不修改任何文件）
///
/// # 返回
/// 根目录不存在或无法读取时返回错误，此时不会产生计划
pub fn plan(params: &RunParams) -> AppResult<Plan> {
    let files = discover_files(&params.root, &params.extensions)?;

    let (entries, records) = match params.mode {
        Mode::Rename => (files.iter().map(plan_rename).collect(), Vec::new()),
        Mode::UpdateTitle => (files.iter().map(plan_title).collect(), Vec::new()),
        Mode::BuildIndex => {
            let extraction = build_index(&files);
            (extraction.entries, extraction.records)
        }
    };

    Ok(Plan {
        mode: params.mode,
        root: params.root.clone(),
        entries,
        records,
        output_dir: params.output_dir.clone(),
    })
}

/// 执行已确认的计划
pub fn commit(plan: &Plan) -> Summary {
    match plan.mode {
        Mode::BuildIndex => commit_index(plan),
        Mode::Rename | Mode::UpdateTitle => commit_mutations(plan),
    }
}

fn commit_mutations(plan: &Plan) -> Summary {
    let outcomes = plan
        .entries
        .iter()
        .map(|entry| {
            let path = entry.file.path.clone();
            if let Some(reason) = &entry.reason {
                return FileOutcome::new(path, OutcomeStatus::Skipped, reason.to_string());
            }
            match commit_entry(entry) {
                Ok(status) => FileOutcome::new(path, status, entry.describe()),
                Err(e) => {
                    error!("{} ❌ {}", entry.file, e);
                    FileOutcome::new(path, OutcomeStatus::Failed, e.to_string())
                }
            }
        })
        .collect();

    Summary::from_outcomes(plan.mode, outcomes, None)
}

fn commit_index(plan: &Plan) -> Summary {
    let written = IndexWriter::new(&plan.output_dir).write(&plan.records);

    let outcomes = plan
        .entries
        .iter()
        .map(|entry| {
            let path = entry.file.path.clone();
            match (&entry.reason, &written) {
                (Some(reason), _) => FileOutcome::new(path, OutcomeStatus::Skipped, reason.to_string()),
                (None, Ok(_)) => FileOutcome::new(path, OutcomeStatus::Indexed, entry.describe()),
                (None, Err(e)) => FileOutcome::new(path, OutcomeStatus::Failed, e.to_string()),
            }
        })
        .collect();

    let index_path = match written {
        Ok(path) => {
            info!("📄 已创建待办列表: {}", path.display());
            Some(path)
        }
        Err(e) => {
            error!("❌ {}", e);
            None
        }
    };

    Summary::from_outcomes(plan.mode, outcomes, index_path)
}

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 运行一次完整流程：计划 → 确认 → 执行 → 审计日志
    ///
    /// # 参数
    /// - `folder`: 基础目录下选中的文件夹
    /// - `mode`: 运行模式
    /// - `confirm`: 确认回调，返回 false 时不做任何修改
    ///
    /// # 返回
    /// 仅在确认被拒绝时返回 None；没有需要执行的项时返回计划阶段的汇总（全部为跳过）
    pub fn run(
        &self,
        folder: &str,
        mode: Mode,
        confirm: impl FnOnce(&Plan) -> bool,
    ) -> AppResult<Option<Summary>> {
        let params = RunParams::from_config(&self.config, folder, mode);
        logging::log_startup(&params.root, mode);

        let plan = plan(&params)?;
        logging::log_plan_preview(&plan);

        let summary = if plan.pending() == 0 {
            if plan.entries.is_empty() {
                warn!("⚠️ 在选择的文件夹中找不到任何文件");
            } else {
                info!("没有文件需要处理");
            }
            plan.summary()
        } else if confirm(&plan) {
            commit(&plan)
        } else {
            info!("取消{}操作", mode);
            return Ok(None);
        };

        self.write_audit_log(&summary);
        logging::print_final_stats(&summary);
        Ok(Some(summary))
    }

    fn write_audit_log(&self, summary: &Summary) {
        let log_path = self.config.log_dir.join(format!(
            "exam_title_{}_{}.log",
            summary.mode.slug(),
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ));
        let result = std::fs::create_dir_all(&self.config.log_dir)
            .map_err(anyhow::Error::from)
            .and_then(|_| logging::init_log_file(&log_path, summary.mode))
            .and_then(|_| logging::append_summary(&log_path, summary));
        if let Err(e) = result {
            warn!("⚠️ 无法写入日志 {}: {}", log_path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Action;
    use std::fs;

    #[test]
    fn test_plan_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let params = RunParams {
            root: dir.path().join("missing"),
            mode: Mode::Rename,
            extensions: vec!["xml".into()],
            output_dir: dir.path().join("out"),
        };
        assert!(plan(&params).is_err());
    }

    #[test]
    fn test_plan_does_not_mutate() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("G")).unwrap();
        fs::write(dir.path().join("G/a.xml"), "<a/>").unwrap();
        fs::write(dir.path().join("loose.xml"), "<a/>").unwrap();

        let params = RunParams {
            root: dir.path().to_path_buf(),
            mode: Mode::Rename,
            extensions: vec!["xml".into()],
            output_dir: dir.path().join("out"),
        };
        let plan = plan(&params).unwrap();
        assert_eq!(plan.entries.len(), 2);
        assert_eq!(plan.entries[0].action, Action::Rename);
        assert_eq!(plan.entries[1].action, Action::Skip);
        assert_eq!(plan.pending(), 1);
        assert!(dir.path().join("G/a.xml").exists());

        let preview = plan.summary();
        assert_eq!(preview.changed, 0);
        assert_eq!(preview.skipped, 1);
    }

    #[test]
    fn test_app_run_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("exam_01_x/G")).unwrap();
        fs::write(dir.path().join("exam_01_x/G/a.xml"), "<a/>").unwrap();

        let config = Config {
            base_dir: dir.path().to_path_buf(),
            log_dir: dir.path().join("log"),
            ..Config::default()
        };
        let app = App::new(config);
        let result = app.run("exam_01_x", Mode::Rename, |_| false).unwrap();
        assert!(result.is_none());
        assert!(dir.path().join("exam_01_x/G/a.xml").exists());
        assert!(!dir.path().join("log").exists());
    }

    #[test]
    fn test_app_run_nothing_pending_returns_summary() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("exam_01_x/G")).unwrap();
        fs::write(dir.path().join("exam_01_x/G/G_a.xml"), "<a/>").unwrap();
        fs::write(dir.path().join("exam_01_x/loose.xml"), "<a/>").unwrap();

        let config = Config {
            base_dir: dir.path().to_path_buf(),
            log_dir: dir.path().join("log"),
            ..Config::default()
        };
        let app = App::new(config);
        let mut asked = false;
        let summary = app
            .run("exam_01_x", Mode::Rename, |_| {
                asked = true;
                true
            })
            .unwrap()
            .unwrap();

        assert!(!asked);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.changed, 0);
        assert!(summary
            .outcomes
            .iter()
            .all(|o| o.status == OutcomeStatus::Skipped));
        assert_eq!(fs::read_dir(dir.path().join("log")).unwrap().count(), 1);
    }

    #[test]
    fn test_app_run_empty_folder_returns_empty_summary() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("exam_01_x")).unwrap();

        let config = Config {
            base_dir: dir.path().to_path_buf(),
            log_dir: dir.path().join("log"),
            ..Config::default()
        };
        let summary = App::new(config)
            .run("exam_01_x", Mode::BuildIndex, |_| true)
            .unwrap()
            .unwrap();
        assert_eq!(summary.processed, 0);
        assert!(summary.index_path.is_none());
    }
}
