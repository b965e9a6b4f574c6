//! 文件发现 - 基础设施层
//!
//! 根目录下的每个子文件夹是一个分组，分组内（含更深层）的文件继承该分组；
//! 直接位于根目录的文件没有分组，排在所有分组之后。

use crate::error::DiscoveryError;
use crate::models::SourceFile;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// 列出基础目录中名称以 `prefix` 开头的文件夹（已排序）
pub fn list_candidate_folders(base_dir: &Path, prefix: &str) -> Result<Vec<String>, DiscoveryError> {
    let mut folders: Vec<String> = read_dir_sorted(base_dir)?
        .into_iter()
        .filter(|p| p.is_dir())
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .filter(|name| name.starts_with(prefix))
        .collect();
    folders.sort();
    Ok(folders)
}

/// 发现根目录下所有待处理文件
///
/// # 参数
/// - `root`: 选中的根目录
/// - `extensions`: 允许的扩展名（小写，不含点），为空时接受全部文件
///
/// # 返回
/// 按"分组内相对路径排序 → 根目录文件"顺序排列的文件列表，ordinal 从 1 开始
pub fn discover_files(root: &Path, extensions: &[String]) -> Result<Vec<SourceFile>, DiscoveryError> {
    let entries = read_dir_sorted(root)?;

    let mut grouped: Vec<(PathBuf, String)> = Vec::new();
    let mut groupless: Vec<PathBuf> = Vec::new();

    for path in entries {
        if path.is_dir() {
            let group = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            for file in walk_files(&path)? {
                grouped.push((file, group.clone()));
            }
        } else if path.is_file() {
            groupless.push(path);
        }
    }

    let relative = |path: &Path| path.strip_prefix(root).unwrap_or(path).to_path_buf();

    grouped.retain(|(path, _)| has_extension(path, extensions));
    groupless.retain(|path| has_extension(path, extensions));
    grouped.sort_by_key(|(path, _)| relative(path));
    groupless.sort_by_key(|path| relative(path));

    let files: Vec<SourceFile> = grouped
        .into_iter()
        .map(|(path, group)| (path, Some(group)))
        .chain(groupless.into_iter().map(|path| (path, None)))
        .enumerate()
        .map(|(idx, (path, group))| {
            let rel = relative(&path);
            SourceFile::new(path, rel, group, idx + 1)
        })
        .collect();

    info!(
        "✓ 在 {} 中找到 {} 个文件",
        root.display(),
        files.len()
    );
    Ok(files)
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !dir.exists() {
        return Err(DiscoveryError::RootNotFound {
            path: dir.display().to_string(),
        });
    }
    if !dir.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            path: dir.display().to_string(),
        });
    }

    let unreadable = |source| DiscoveryError::Unreadable {
        path: dir.display().to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        paths.push(entry.map_err(unreadable)?.path());
    }
    paths.sort();
    Ok(paths)
}

fn walk_files(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            path: dir.display().to_string(),
            source,
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    debug!("{}: {} 个文件", dir.display(), files.len());
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| *e == ext))
}
