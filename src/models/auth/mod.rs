pub mod requests;
pub mod responses;

pub use requests::{LoginRequest, UpdateProfileRequest};
pub use responses::{
    LoginResponse, ProfileRef, RefreshTokenResponse, TOKEN_TYPE, TokenVerificationResponse,
    UserInfoResponse,
};
