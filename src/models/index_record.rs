use serde::Serialize;

/// 待办索引表中的一行
///
/// 后四个字段留空，由下游系统创建题库后回填。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexRecord {
    /// 分组文件夹（根目录中的文件为空）
    pub group: String,
    /// xml 文件名
    pub filename: String,
    /// 标题名称（Big5 槽位）
    pub title: String,
    /// 题库编号
    pub bank_id: String,
    /// 题库创建时间
    pub bank_created_at: String,
    /// 题库标题
    pub bank_title: String,
    /// 标题修改时间
    pub title_modified_at: String,
}

impl IndexRecord {
    /// 表头（与字段顺序一致）
    pub const HEADERS: [&'static str; 7] = [
        "資料夾",
        "xml文件名",
        "標題名稱",
        "題庫編號",
        "題庫創建時間",
        "題庫標題",
        "標題修改時間",
    ];

    pub fn new(group: impl Into<String>, filename: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            filename: filename.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// 按表头顺序返回各列
    pub fn columns(&self) -> [&str; 7] {
        [
            self.group.as_str(),
            self.filename.as_str(),
            self.title.as_str(),
            self.bank_id.as_str(),
            self.bank_created_at.as_str(),
            self.bank_title.as_str(),
            self.title_modified_at.as_str(),
        ]
    }
}
