use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 实习状态
///
/// `Pendiente -> EnProceso -> Finalizada`，未结束前可取消为 `Cancelada`。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/internship.ts")]
pub enum InternshipStatus {
    Pendiente,
    EnProceso,
    Finalizada,
    Cancelada,
}

impl InternshipStatus {
    pub const ALL: [InternshipStatus; 4] = [
        InternshipStatus::Pendiente,
        InternshipStatus::EnProceso,
        InternshipStatus::Finalizada,
        InternshipStatus::Cancelada,
    ];

    /// 未结束（占用学生名额）的状态
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            InternshipStatus::Pendiente | InternshipStatus::EnProceso
        )
    }

    pub fn can_transition_to(&self, next: InternshipStatus) -> bool {
        use InternshipStatus::*;
        matches!(
            (self, next),
            (Pendiente, EnProceso)
                | (EnProceso, Finalizada)
                | (Pendiente, Cancelada)
                | (EnProceso, Cancelada)
        )
    }
}

impl std::fmt::Display for InternshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InternshipStatus::Pendiente => "Pendiente",
            InternshipStatus::EnProceso => "EnProceso",
            InternshipStatus::Finalizada => "Finalizada",
            InternshipStatus::Cancelada => "Cancelada",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for InternshipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pendiente" => Ok(InternshipStatus::Pendiente),
            "EnProceso" => Ok(InternshipStatus::EnProceso),
            "Finalizada" => Ok(InternshipStatus::Finalizada),
            "Cancelada" => Ok(InternshipStatus::Cancelada),
            _ => Err(format!("Invalid internship status: {s}")),
        }
    }
}

/// 实习（Pasantía）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/internship.ts")]
pub struct Internship {
    pub id: i64,
    pub student_id: i64,
    pub company_id: i64,
    pub workshop_id: i64,
    // 校内导师
    pub tutor_id: Option<i64>,
    // 企业联系人
    pub contact_id: Option<i64>,
    pub position: Option<String>,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: chrono::DateTime<chrono::Utc>,
    pub hours_required: i32,
    pub status: InternshipStatus,
    pub closed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        use InternshipStatus::*;
        assert!(Pendiente.can_transition_to(EnProceso));
        assert!(EnProceso.can_transition_to(Finalizada));
        assert!(Pendiente.can_transition_to(Cancelada));
        assert!(EnProceso.can_transition_to(Cancelada));
    }

    #[test]
    fn test_rejected_transitions() {
        use InternshipStatus::*;
        assert!(!Pendiente.can_transition_to(Finalizada));
        assert!(!Finalizada.can_transition_to(EnProceso));
        assert!(!Finalizada.can_transition_to(Cancelada));
        assert!(!Cancelada.can_transition_to(Pendiente));
        assert!(!EnProceso.can_transition_to(EnProceso));
    }

    #[test]
    fn test_status_strings_match_serde() {
        for status in InternshipStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
            assert_eq!(status.to_string().parse::<InternshipStatus>(), Ok(status));
        }
    }
}
