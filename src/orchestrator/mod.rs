//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (plan / commit，处理 Vec<SourceFile>)
//!     ↓
//! index_builder (索引模式：提取 + 排序)
//!     ↓
//! workflow::title_mutator (处理单个文件)
//!     ↓
//! services (能力层：codec / normalizer / natural order / index writer)
//!     ↓
//! infrastructure (基础设施：discovery / TitleDocument)
//! ```
//!
//! 只做调度和统计，不做具体业务判断。

pub mod batch_processor;
pub mod index_builder;

pub use batch_processor::{commit, plan, App, RunParams};
pub use index_builder::{build_index, sort_records};
