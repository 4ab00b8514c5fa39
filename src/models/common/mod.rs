pub mod pagination;
pub mod response;
pub mod status;

pub use pagination::{PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
pub use status::RecordStatus;
