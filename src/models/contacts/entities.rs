use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::RecordStatus;

/// 企业联系人（企业方实习指导人）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/contact.ts")]
pub struct Contact {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: RecordStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
