use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 记录状态（软删除标记）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/common.ts")]
pub enum RecordStatus {
    #[default]
    Activo,
    Eliminado,
}

impl RecordStatus {
    pub const ACTIVE: &'static str = "Activo";
    pub const DELETED: &'static str = "Eliminado";

    pub fn is_active(&self) -> bool {
        *self == RecordStatus::Activo
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Activo => write!(f, "{}", RecordStatus::ACTIVE),
            RecordStatus::Eliminado => write!(f, "{}", RecordStatus::DELETED),
        }
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            RecordStatus::ACTIVE => Ok(RecordStatus::Activo),
            RecordStatus::DELETED => Ok(RecordStatus::Eliminado),
            _ => Err(format!("Invalid record status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_status_round_trip_through_str() {
        assert_eq!("Activo".parse::<RecordStatus>(), Ok(RecordStatus::Activo));
        assert_eq!(RecordStatus::Eliminado.to_string(), "Eliminado");
        assert!("activo".parse::<RecordStatus>().is_err());
    }

    #[test]
    fn test_record_status_json() {
        let json = serde_json::to_string(&RecordStatus::Eliminado).unwrap();
        assert_eq!(json, "\"Eliminado\"");
    }
}
