use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::RecordStatus;

/// 工坊（专业方向，Taller）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/workshop.ts")]
pub struct Workshop {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub status: RecordStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
