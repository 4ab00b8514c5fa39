use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学习成果（RA）评分项数量
pub const RA_COUNT: usize = 7;

/// 七项学习成果（RA1..RA7）评分，每项 0..=100
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct RaScores {
    pub ra1: f64,
    pub ra2: f64,
    pub ra3: f64,
    pub ra4: f64,
    pub ra5: f64,
    pub ra6: f64,
    pub ra7: f64,
}

impl RaScores {
    pub fn from_array(values: [f64; RA_COUNT]) -> Self {
        let [ra1, ra2, ra3, ra4, ra5, ra6, ra7] = values;
        Self {
            ra1,
            ra2,
            ra3,
            ra4,
            ra5,
            ra6,
            ra7,
        }
    }

    pub fn to_array(&self) -> [f64; RA_COUNT] {
        [
            self.ra1, self.ra2, self.ra3, self.ra4, self.ra5, self.ra6, self.ra7,
        ]
    }

    /// 校验每一项都是 0..=100 的有限数，返回第一个不合法项的说明
    pub fn validate(&self) -> Result<(), String> {
        for (idx, score) in self.to_array().iter().enumerate() {
            if !score.is_finite() || !(0.0..=100.0).contains(score) {
                return Err(format!(
                    "RA{} score must be between 0 and 100, got {}",
                    idx + 1,
                    score
                ));
            }
        }
        Ok(())
    }
}

/// 某评价人对某实习的量规评分
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct Evaluation {
    pub id: i64,
    pub internship_id: i64,
    pub evaluator_id: i64,
    #[serde(flatten)]
    #[ts(flatten)]
    pub scores: RaScores,
    pub comment: Option<String>,
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_bounds() {
        let scores = RaScores::from_array([0.0, 100.0, 50.5, 70.0, 99.9, 1.0, 85.0]);
        assert!(scores.validate().is_ok());
    }

    #[test]
    fn test_validate_names_offending_criterion() {
        let scores = RaScores::from_array([80.0, 80.0, 101.0, 80.0, 80.0, 80.0, 80.0]);
        let err = scores.validate().unwrap_err();
        assert!(err.starts_with("RA3"));

        let scores = RaScores::from_array([80.0, 80.0, 80.0, 80.0, 80.0, 80.0, f64::NAN]);
        assert!(scores.validate().unwrap_err().starts_with("RA7"));

        let scores = RaScores::from_array([-1.0, 80.0, 80.0, 80.0, 80.0, 80.0, 80.0]);
        assert!(scores.validate().unwrap_err().starts_with("RA1"));
    }

    #[test]
    fn test_array_order_matches_fields() {
        let scores = RaScores::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(scores.ra1, 1.0);
        assert_eq!(scores.ra7, 7.0);
        assert_eq!(scores.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }
}
