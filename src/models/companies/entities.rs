use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::RecordStatus;

/// 实习企业
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/company.ts")]
pub struct Company {
    pub id: i64,
    // 企业登录账号（角色为 company 的用户）
    pub user_id: Option<i64>,
    pub name: String,
    pub tax_id: Option<String>,
    pub sector: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: RecordStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
