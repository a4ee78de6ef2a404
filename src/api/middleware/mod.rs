pub mod admin;
pub mod bearer;

pub use admin::{ADMIN_TOKEN_HEADER, AdminAuth};
pub use bearer::BearerAuth;
