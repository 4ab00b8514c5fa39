use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::RecordStatus;

/// 校内导师，负责一个工坊的学生实习
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct Tutor {
    pub id: i64,
    pub user_id: i64,
    pub workshop_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub status: RecordStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
