//! 索引表写入服务 - 业务能力层
//!
//! 只负责把已排序的 [`IndexRecord`] 写成 CSV，不关心排序与流程

use crate::error::WriteError;
use crate::models::IndexRecord;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 让表格软件识别 UTF-8
const UTF8_BOM: &str = "\u{feff}";

/// 索引表写入服务
pub struct IndexWriter {
    output_dir: PathBuf,
}

impl IndexWriter {
    /// 创建新的写入服务
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 带时间戳的输出文件名，例如 `exam_todolist_20250101_120000.csv`
    pub fn timestamped_file_name() -> String {
        format!(
            "exam_todolist_{}.csv",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        )
    }

    /// 写入索引表，输出目录不存在时创建
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub fn write(&self, records: &[IndexRecord]) -> Result<PathBuf, WriteError> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir).map_err(|source| WriteError::ExportFailed {
                path: self.output_dir.display().to_string(),
                source,
            })?;
            info!("📁 已创建文件夹: {}", self.output_dir.display());
        }

        let path = self.output_dir.join(Self::timestamped_file_name());
        write_csv(&path, records).map_err(|source| WriteError::ExportFailed {
            path: path.display().to_string(),
            source,
        })?;

        debug!("写入 {} 行到 {}", records.len(), path.display());
        Ok(path)
    }
}

/// 将记录写入指定 CSV 文件
pub fn write_csv(path: &Path, records: &[IndexRecord]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(render_csv(records).as_bytes())?;
    file.flush()
}

/// 生成 CSV 文本（含 BOM 与表头）
pub fn render_csv(records: &[IndexRecord]) -> String {
    let mut out = String::from(UTF8_BOM);
    push_row(&mut out, &IndexRecord::HEADERS);
    for record in records {
        push_row(&mut out, &record.columns());
    }
    out
}

fn push_row(out: &mut String, columns: &[&str]) {
    let row: Vec<String> = columns.iter().map(|c| escape_field(c)).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

/// 含逗号、引号或换行的字段加引号，内部引号加倍
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_csv_header_and_rows() {
        let records = vec![
            IndexRecord::new("A", "A_y.xml", "第1課"),
            IndexRecord::new("", "root.xml", "含,逗號"),
        ];
        let csv = render_csv(&records);
        let lines: Vec<&str> = csv.trim_start_matches(UTF8_BOM).split("\r\n").collect();
        assert_eq!(
            lines[0],
            "資料夾,xml文件名,標題名稱,題庫編號,題庫創建時間,題庫標題,標題修改時間"
        );
        assert_eq!(lines[1], "A,A_y.xml,第1課,,,,");
        assert_eq!(lines[2], ",root.xml,\"含,逗號\",,,,");
    }

    #[test]
    fn test_escape_field_quotes() {
        assert_eq!(escape_field(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(escape_field("plain"), "plain");
    }

    #[test]
    fn test_write_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let writer = IndexWriter::new(dir.path().join("out"));
        let path = writer.write(&[IndexRecord::new("A", "a.xml", "t")]).unwrap();
        assert!(path.starts_with(dir.path().join("out")));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(UTF8_BOM));
        assert!(content.contains("A,a.xml,t"));
    }
}
