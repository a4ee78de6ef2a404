//! API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::LeanurlsError;

/// Numeric code carried in every JSON envelope.
///
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 链接错误
/// - 4000-4099: 用户错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    TokenInvalid = 2002,

    // 链接错误 3000-3099
    LinkNotFound = 3000,

    // 用户错误 4000-4099
    UserNotFound = 4000,
}

impl From<&LeanurlsError> for ErrorCode {
    fn from(err: &LeanurlsError) -> Self {
        match err {
            LeanurlsError::Unauthenticated(_) => ErrorCode::Unauthorized,
            LeanurlsError::InvalidToken(_) => ErrorCode::TokenInvalid,
            LeanurlsError::Forbidden(_) => ErrorCode::Forbidden,
            LeanurlsError::Validation(_) => ErrorCode::BadRequest,
            LeanurlsError::NotFound(_) => ErrorCode::NotFound,
            LeanurlsError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            LeanurlsError::DatabaseConfig(_)
            | LeanurlsError::DatabaseOperation(_)
            | LeanurlsError::Configuration(_)
            | LeanurlsError::Internal(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::TokenInvalid).unwrap(), "2002");
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            ErrorCode::from(&LeanurlsError::validation("x")),
            ErrorCode::BadRequest
        );
        assert_eq!(
            ErrorCode::from(&LeanurlsError::database_operation("x")),
            ErrorCode::InternalServerError
        );
        assert_eq!(
            ErrorCode::from(&LeanurlsError::invalid_token("x")),
            ErrorCode::TokenInvalid
        );
    }
}
