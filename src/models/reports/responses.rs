use serde::Serialize;
use ts_rs::TS;

/// 各状态实习数量
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct InternshipStatusCounts {
    pub pendiente: i64,
    pub en_proceso: i64,
    pub finalizada: i64,
    pub cancelada: i64,
}

impl InternshipStatusCounts {
    pub fn total(&self) -> i64 {
        self.pendiente + self.en_proceso + self.finalizada + self.cancelada
    }
}

/// 模块通过情况
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ModuleSummary {
    pub total: i64,
    pub approved: i64,
    pub failed: i64,
    // 无模块时为 None
    pub average: Option<f64>,
    /// 通过率（百分比，两位小数）
    pub pass_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportSummary {
    pub students_total: i64,
    pub students_active: i64,
    pub internships: InternshipStatusCounts,
    pub modules: ModuleSummary,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct WorkshopReport {
    pub workshop_id: i64,
    pub workshop_name: String,
    pub students_total: i64,
    pub students_active: i64,
    pub internships: InternshipStatusCounts,
    pub modules: ModuleSummary,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
