use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::RecordStatus;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    // 登录账号
    pub user_id: i64,
    // 所属工坊
    pub workshop_id: i64,
    pub first_name: String,
    pub last_name: String,
    // 身份证号
    pub document_id: Option<String>,
    pub phone: Option<String>,
    pub status: RecordStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
