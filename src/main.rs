use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use exam_title_tool::infrastructure::list_candidate_folders;
use exam_title_tool::models::{Mode, Plan, Summary};
use exam_title_tool::{logger, App, Config};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "exam-title-tool", version, about = "XML 文件处理工具")]
struct Cli {
    /// TOML 配置文件
    #[arg(long, env = "EXAM_CONFIG")]
    config: Option<PathBuf>,

    /// 存放 exam_01_* 文件夹的基础目录
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,

    /// 以 JSON 输出结果汇总
    #[arg(long)]
    json: bool,

    /// 跳过确认直接执行
    #[arg(short, long)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 列出可选择的文件夹
    List,
    /// 重新命名文件（加上分组前缀）
    Rename {
        #[arg(long)]
        folder: String,
    },
    /// 更新题库标题（加上分组前缀）
    UpdateTitle {
        #[arg(long)]
        folder: String,
    },
    /// 创建待办列表
    BuildIndex {
        #[arg(long)]
        folder: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    if let Some(base_dir) = &cli.base_dir {
        config.base_dir = base_dir.clone();
    }
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logger::init(config.verbose_logging);

    let (folder, mode) = match cli.command {
        Command::List => return list_folders(&config),
        Command::Rename { folder } => (folder, Mode::Rename),
        Command::UpdateTitle { folder } => (folder, Mode::UpdateTitle),
        Command::BuildIndex { folder } => (folder, Mode::BuildIndex),
    };

    let assume_yes = cli.yes;
    let app = App::new(config);
    let summary = app
        .run(&folder, mode, |plan| assume_yes || confirm(plan))
        .with_context(|| format!("处理文件夹失败: {}", folder))?;

    if let Some(summary) = summary {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }
    }

    Ok(())
}

fn list_folders(config: &Config) -> Result<()> {
    let folders = list_candidate_folders(&config.base_dir, &config.root_prefix)
        .with_context(|| format!("无法读取基础目录: {}", config.base_dir.display()))?;

    if folders.is_empty() {
        println!("找不到任何 {} 开头的文件夹", config.root_prefix);
        return Ok(());
    }

    println!("找到以下 {} 文件夹:", config.root_prefix);
    for (i, folder) in folders.iter().enumerate() {
        println!("{}. {}", i + 1, folder);
    }
    Ok(())
}

/// 询问是否执行计划，读取失败视为取消
fn confirm(plan: &Plan) -> bool {
    println!("\n{}: 待执行 {} 项", plan.mode, plan.pending());
    print!("確認執行？(y/N): ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "是")
}

fn print_summary(summary: &Summary) {
    println!(
        "\n完成! {}: 成功 {}, 跳过 {}, 失败 {}",
        summary.mode, summary.changed, summary.skipped, summary.errored
    );
    for outcome in &summary.outcomes {
        println!("  [{}] {} - {}", outcome.status, outcome.path.display(), outcome.detail);
    }
    if let Some(path) = &summary.index_path {
        info!("已创建待办列表: {}", path.display());
        println!("包含 {} 笔资料: {}", summary.changed, path.display());
    }
}
