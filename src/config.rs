use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 存放 exam_01_* 文件夹的基础目录
    pub base_dir: PathBuf,
    /// 候选文件夹名称前缀
    pub root_prefix: String,
    /// 索引表输出目录
    pub output_dir: PathBuf,
    /// 处理的文件扩展名（不区分大小写，空表示全部）
    pub extensions: Vec<String>,
    /// 审计日志目录
    pub log_dir: PathBuf,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            root_prefix: "exam_01_".to_string(),
            output_dir: PathBuf::from("exam_02_xml_todolist"),
            extensions: vec!["xml".to_string()],
            log_dir: PathBuf::from("log"),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：指定了 TOML 文件时从文件读取，否则只读环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::from_env()?,
        };
        Ok(config)
    }

    /// 从环境变量加载，缺失的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，再叠加环境变量
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?;

        config.with_env_overrides()
    }

    fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let extensions = match std::env::var("EXAM_EXTENSIONS") {
            Ok(v) => parse_extensions(&v),
            Err(_) => normalize_extensions(&self.extensions),
        };

        let verbose_logging = match std::env::var("VERBOSE_LOGGING") {
            Ok(v) => v
                .parse()
                .map_err(|_| ConfigError::EnvVarParseFailed {
                    var_name: "VERBOSE_LOGGING".to_string(),
                    value: v.clone(),
                    expected_type: "bool".to_string(),
                })?,
            Err(_) => self.verbose_logging,
        };

        Ok(Self {
            base_dir: std::env::var("EXAM_BASE_DIR").map(PathBuf::from).unwrap_or(self.base_dir),
            root_prefix: std::env::var("EXAM_ROOT_PREFIX").unwrap_or(self.root_prefix),
            output_dir: std::env::var("EXAM_OUTPUT_DIR").map(PathBuf::from).unwrap_or(self.output_dir),
            extensions,
            log_dir: std::env::var("EXAM_LOG_DIR").map(PathBuf::from).unwrap_or(self.log_dir),
            verbose_logging,
        })
    }
}

/// 解析逗号分隔的扩展名列表，去掉前导点
pub fn parse_extensions(raw: &str) -> Vec<String> {
    normalize_extensions(raw.split(','))
}

/// 统一为小写、不含点的扩展名，丢弃空项
fn normalize_extensions<I, S>(extensions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|s| s.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
