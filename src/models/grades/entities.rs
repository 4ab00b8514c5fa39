use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::evaluations::entities::RaScores;

/// 评定结果
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradeResult {
    Aprobado,
    Reprobado,
}

impl std::fmt::Display for GradeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeResult::Aprobado => write!(f, "Aprobado"),
            GradeResult::Reprobado => write!(f, "Reprobado"),
        }
    }
}

impl std::str::FromStr for GradeResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Aprobado" => Ok(GradeResult::Aprobado),
            "Reprobado" => Ok(GradeResult::Reprobado),
            _ => Err(format!("Invalid grade result: {s}")),
        }
    }
}

/// 实习成绩（Calificación）：各 RA 的平均分与总平均
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub internship_id: i64,
    pub student_id: i64,
    #[serde(flatten)]
    #[ts(flatten)]
    pub criteria: RaScores,
    pub average: f64,
    pub result: GradeResult,
    pub evaluation_count: i32,
    pub graded_by: i64,
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 由评价计算出的成绩（尚未持久化）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeOutcome {
    #[serde(flatten)]
    #[ts(flatten)]
    pub criteria: RaScores,
    pub average: f64,
    pub result: GradeResult,
    pub evaluation_count: i32,
}
