use std::fmt;

use actix_web::http::StatusCode;

/// Message returned to clients for every store or internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub enum LeanurlsError {
    Unauthenticated(String),
    InvalidToken(String),
    Forbidden(String),
    Validation(String),
    NotFound(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Configuration(String),
    Internal(String),
}

impl LeanurlsError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LeanurlsError::Unauthenticated(_) => "E001",
            LeanurlsError::InvalidToken(_) => "E002",
            LeanurlsError::Forbidden(_) => "E003",
            LeanurlsError::Validation(_) => "E004",
            LeanurlsError::NotFound(_) => "E005",
            LeanurlsError::DatabaseConfig(_) => "E006",
            LeanurlsError::DatabaseConnection(_) => "E007",
            LeanurlsError::DatabaseOperation(_) => "E008",
            LeanurlsError::Configuration(_) => "E009",
            LeanurlsError::Internal(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LeanurlsError::Unauthenticated(_) => "Unauthenticated",
            LeanurlsError::InvalidToken(_) => "Invalid Token",
            LeanurlsError::Forbidden(_) => "Forbidden",
            LeanurlsError::Validation(_) => "Validation Error",
            LeanurlsError::NotFound(_) => "Resource Not Found",
            LeanurlsError::DatabaseConfig(_) => "Database Configuration Error",
            LeanurlsError::DatabaseConnection(_) => "Database Connection Error",
            LeanurlsError::DatabaseOperation(_) => "Database Operation Error",
            LeanurlsError::Configuration(_) => "Configuration Error",
            LeanurlsError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LeanurlsError::Unauthenticated(msg) => msg,
            LeanurlsError::InvalidToken(msg) => msg,
            LeanurlsError::Forbidden(msg) => msg,
            LeanurlsError::Validation(msg) => msg,
            LeanurlsError::NotFound(msg) => msg,
            LeanurlsError::DatabaseConfig(msg) => msg,
            LeanurlsError::DatabaseConnection(msg) => msg,
            LeanurlsError::DatabaseOperation(msg) => msg,
            LeanurlsError::Configuration(msg) => msg,
            LeanurlsError::Internal(msg) => msg,
        }
    }

    /// Whether the message may be shown to an API client as-is.
    ///
    /// Store and internal failures carry driver text (SQL, constraint names)
    /// and are replaced by [`INTERNAL_ERROR_MESSAGE`].
    pub fn is_client_safe(&self) -> bool {
        matches!(
            self,
            LeanurlsError::Unauthenticated(_)
                | LeanurlsError::InvalidToken(_)
                | LeanurlsError::Forbidden(_)
                | LeanurlsError::Validation(_)
                | LeanurlsError::NotFound(_)
        )
    }

    /// 返回给客户端的消息
    pub fn client_message(&self) -> &str {
        if self.is_client_safe() {
            self.message()
        } else {
            INTERNAL_ERROR_MESSAGE
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            LeanurlsError::Unauthenticated(_) | LeanurlsError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            LeanurlsError::Forbidden(_) => StatusCode::FORBIDDEN,
            LeanurlsError::Validation(_) => StatusCode::BAD_REQUEST,
            LeanurlsError::NotFound(_) => StatusCode::NOT_FOUND,
            LeanurlsError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            LeanurlsError::DatabaseConfig(_)
            | LeanurlsError::DatabaseOperation(_)
            | LeanurlsError::Configuration(_)
            | LeanurlsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LeanurlsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LeanurlsError {}

// 便捷的构造函数
impl LeanurlsError {
    pub fn unauthenticated<T: Into<String>>(msg: T) -> Self {
        LeanurlsError::Unauthenticated(msg.into())
    }

    pub fn invalid_token<T: Into<String>>(msg: T) -> Self {
        LeanurlsError::InvalidToken(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        LeanurlsError::Forbidden(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LeanurlsError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LeanurlsError::NotFound(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LeanurlsError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LeanurlsError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LeanurlsError::DatabaseOperation(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        LeanurlsError::Configuration(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        LeanurlsError::Internal(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LeanurlsError {
    fn from(err: sea_orm::DbErr) -> Self {
        LeanurlsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LeanurlsError {
    fn from(err: std::io::Error) -> Self {
        LeanurlsError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for LeanurlsError {
    fn from(err: serde_json::Error) -> Self {
        LeanurlsError::Internal(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for LeanurlsError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        LeanurlsError::InvalidToken(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LeanurlsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_masked() {
        let err = LeanurlsError::database_operation("UNIQUE constraint failed: links.alias");
        assert!(!err.is_client_safe());
        assert_eq!(err.client_message(), INTERNAL_ERROR_MESSAGE);
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = LeanurlsError::validation("Alias must be at most 32 characters");
        assert_eq!(err.client_message(), "Alias must be at most 32 characters");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_errors_map_to_401() {
        assert_eq!(
            LeanurlsError::unauthenticated("missing").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            LeanurlsError::invalid_token("expired").http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_db_err_conversion() {
        let err: LeanurlsError = sea_orm::DbErr::Custom("boom".into()).into();
        match err {
            LeanurlsError::DatabaseOperation(msg) => assert!(msg.contains("boom")),
            other => panic!("Expected DatabaseOperation, got {:?}", other),
        }
    }
}
