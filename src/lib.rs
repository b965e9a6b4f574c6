//! # Exam Title Tool
//!
//! 题库 XML 文件的批量处理工具：重新命名文件、更新题库标题、创建待办列表
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 文件系统与 XML 文档，只暴露能力
//! - `discovery` - 按分组发现文件，顺序固定
//! - `TitleDocument` - 绑定 WisdomMaster 命名空间的标题读写
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 纯函数能力，不接触流程
//! - `title_codec` - 多语系序列化标题编解码
//! - `numeral_normalizer` - 中文数字转阿拉伯数字（仅用于排序）
//! - `natural_order` - 自然排序比较
//! - `IndexWriter` - 写待办索引表
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文件"的完整处理流程
//! - `title_mutator` - READ → PARSE → SKIP/EXTRACT → SKIP/REWRITE → WRITE
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - `plan` / `commit` 两个入口
//! - `orchestrator/index_builder` - 提取并排序待办索引

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::TitleDocument;
pub use models::{IndexRecord, Mode, Plan, PlanEntry, SerializedRecord, SkipReason, Summary};
pub use orchestrator::{commit, plan, App, RunParams};
pub use services::natural_order::compare;
pub use services::numeral_normalizer::normalize;
pub use services::title_codec::{decode, encode};
