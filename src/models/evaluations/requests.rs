use serde::Deserialize;
use ts_rs::TS;

use super::entities::RaScores;

// 提交/更新评价请求（同一评价人对同一实习只保留一份）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct UpsertEvaluationRequest {
    #[serde(flatten)]
    #[ts(flatten)]
    pub scores: RaScores,
    pub comment: Option<String>,
}
