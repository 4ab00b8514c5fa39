use super::entities::User;
use crate::models::auth::ProfileRef;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 单个用户，附带关联档案
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserResponse {
    pub user: User,
    pub profile: Option<ProfileRef>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}
