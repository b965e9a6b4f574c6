use thiserror::Error;

/// 应用程序错误类型（致命错误）
///
/// 单个文件的解析、编码、写入错误不会中止整批，而是转换为跳过原因或失败结果
#[derive(Debug, Error)]
pub enum AppError {
    /// 目录发现错误（致命，在生成计划前中止）
    #[error("目录错误: {0}")]
    Discovery(#[from] DiscoveryError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 目录发现错误
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// 根目录不存在
    #[error("目录不存在: {path}")]
    RootNotFound { path: String },
    /// 路径不是目录
    #[error("不是目录: {path}")]
    NotADirectory { path: String },
    /// 读取目录失败
    #[error("无法读取目录 ({path}): {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 遍历子目录失败
    #[error("遍历目录失败 ({path}): {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },
}

/// 解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// XML 格式错误
    #[error("XML 解析失败 ({path}, 位置 {position}): {source}")]
    MalformedXml {
        path: String,
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    /// 按声明的编码无法解码
    #[error("无法按 {encoding} 解码 ({path})")]
    Undecodable { path: String, encoding: String },
}

/// 编码错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// 声明长度与实际 UTF-8 字节长度不一致
    #[error("长度不一致: 声明 {declared} 字节, 实际 {actual} 字节")]
    LengthMismatch { declared: usize, actual: usize },
    /// 值中含有引号，编码后无法再解析
    #[error("标题含有引号，无法编码: {value}")]
    QuoteInValue { value: String },
}

/// 写入错误
#[derive(Debug, Error)]
pub enum WriteError {
    /// 重命名失败
    #[error("重命名失败 ({from} -> {to}): {source}")]
    RenameFailed {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },
    /// 目标文件已存在
    #[error("目标文件已存在: {path}")]
    TargetExists { path: String },
    /// 保存文件失败
    #[error("保存文件失败 ({path}): {source}")]
    SaveFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 提交时重新读取失败
    #[error("提交时重新读取失败: {0}")]
    Reload(#[from] ParseError),
    /// 提交时标题已不存在
    #[error("提交时找不到标题: {path}")]
    TitleVanished { path: String },
    /// 导出索引失败
    #[error("导出索引失败 ({path}): {source}")]
    ExportFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 便捷构造函数 ==========

impl ParseError {
    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        ParseError::ReadFailed {
            path: path.into(),
            source,
        }
    }
}

impl WriteError {
    /// 创建保存失败错误
    pub fn save_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        WriteError::SaveFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
