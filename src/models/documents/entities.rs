use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 文档类别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub enum DocumentType {
    Cv,
    Agreement,
    Report,
    Other,
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Cv => write!(f, "cv"),
            DocumentType::Agreement => write!(f, "agreement"),
            DocumentType::Report => write!(f, "report"),
            DocumentType::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cv" => Ok(DocumentType::Cv),
            "agreement" => Ok(DocumentType::Agreement),
            "report" => Ok(DocumentType::Report),
            "other" => Ok(DocumentType::Other),
            _ => Err(format!("Invalid document type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct Document {
    pub id: i64,
    // 下载令牌
    pub download_token: String,
    pub original_name: String,
    // 磁盘上的文件名，不对外暴露
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub stored_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub document_type: DocumentType,
    // 上传者
    pub owner_id: i64,
    pub student_id: Option<i64>,
    pub internship_id: Option<i64>,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_parse() {
        assert_eq!("CV".parse::<DocumentType>(), Ok(DocumentType::Cv));
        assert_eq!(" report ".parse::<DocumentType>(), Ok(DocumentType::Report));
        assert!("invoice".parse::<DocumentType>().is_err());
        assert_eq!(DocumentType::Agreement.to_string(), "agreement");
    }
}
