//! RA 评分汇总
//!
//! 单项平均 = 该 RA 在所有评价中的算术平均；总平均 = 七项单项平均的平均。
//! 两者均四舍五入到两位小数，总平均不低于及格线即为 `Aprobado`。

use super::entities::{GradeOutcome, GradeResult};
use crate::models::evaluations::entities::{RA_COUNT, RaScores};

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 各 RA 的平均分，无评价时返回 None
pub fn criterion_averages(evaluations: &[RaScores]) -> Option<RaScores> {
    if evaluations.is_empty() {
        return None;
    }

    let mut sums = [0.0_f64; RA_COUNT];
    for scores in evaluations {
        for (sum, value) in sums.iter_mut().zip(scores.to_array()) {
            *sum += value;
        }
    }

    let count = evaluations.len() as f64;
    Some(RaScores::from_array(sums.map(|sum| round2(sum / count))))
}

/// 七项平均的总平均
pub fn overall_average(criteria: &RaScores) -> f64 {
    let values = criteria.to_array();
    round2(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn result_for(average: f64, pass_threshold: f64) -> GradeResult {
    if average >= pass_threshold {
        GradeResult::Aprobado
    } else {
        GradeResult::Reprobado
    }
}

/// 根据实习的全部评价计算成绩
pub fn compute_outcome(evaluations: &[RaScores], pass_threshold: f64) -> Option<GradeOutcome> {
    let criteria = criterion_averages(evaluations)?;
    let average = overall_average(&criteria);

    Some(GradeOutcome {
        criteria,
        average,
        result: result_for(average, pass_threshold),
        evaluation_count: evaluations.len() as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(value: f64) -> RaScores {
        RaScores::from_array([value; RA_COUNT])
    }

    #[test]
    fn test_no_evaluations_yields_nothing() {
        assert!(criterion_averages(&[]).is_none());
        assert!(compute_outcome(&[], 70.0).is_none());
    }

    #[test]
    fn test_single_evaluation_is_its_own_average() {
        let scores = RaScores::from_array([80.0, 70.0, 90.0, 60.0, 100.0, 75.0, 85.0]);
        let outcome = compute_outcome(&[scores], 70.0).unwrap();

        assert_eq!(outcome.criteria, scores);
        assert_eq!(outcome.average, 80.0);
        assert_eq!(outcome.result, GradeResult::Aprobado);
        assert_eq!(outcome.evaluation_count, 1);
    }

    #[test]
    fn test_criterion_averages_over_evaluations() {
        let a = RaScores::from_array([100.0, 50.0, 70.0, 70.0, 70.0, 70.0, 70.0]);
        let b = RaScores::from_array([80.0, 51.0, 70.0, 70.0, 70.0, 70.0, 70.0]);
        let criteria = criterion_averages(&[a, b]).unwrap();

        assert_eq!(criteria.ra1, 90.0);
        assert_eq!(criteria.ra2, 50.5);
        assert_eq!(criteria.ra3, 70.0);
    }

    #[test]
    fn test_averages_round_to_two_decimals() {
        let a = uniform(70.0);
        let b = uniform(70.0);
        let c = uniform(71.0);
        let criteria = criterion_averages(&[a, b, c]).unwrap();
        // 211 / 3 = 70.333...
        assert_eq!(criteria.ra1, 70.33);
        assert_eq!(overall_average(&criteria), 70.33);
        assert_eq!(round2(2.345_6), 2.35);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(result_for(70.0, 70.0), GradeResult::Aprobado);
        assert_eq!(result_for(69.99, 70.0), GradeResult::Reprobado);
        assert_eq!(result_for(100.0, 70.0), GradeResult::Aprobado);

        let outcome = compute_outcome(&[uniform(69.0)], 70.0).unwrap();
        assert_eq!(outcome.result, GradeResult::Reprobado);
        let outcome = compute_outcome(&[uniform(69.0)], 60.0).unwrap();
        assert_eq!(outcome.result, GradeResult::Aprobado);
    }
}
