use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::grades::entities::GradeResult;

/// 实习模块（Módulo de pasantía）：学生在某工坊的实习通过/未通过记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/module.ts")]
pub struct InternshipModule {
    pub id: i64,
    pub student_id: i64,
    pub workshop_id: i64,
    // 取得当前平均分的实习与成绩
    pub internship_id: i64,
    pub grade_id: i64,
    pub average: f64,
    pub result: GradeResult,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
