//! JSON envelope helpers shared by all handlers

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::error_code::ErrorCode;
use crate::errors::LeanurlsError;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// Maps a [`LeanurlsError`] to status, code and a client-safe message.
/// Details of store and internal failures only reach the log.
pub fn error_from_leanurls(err: &LeanurlsError) -> HttpResponse {
    if !err.is_client_safe() {
        error!("{} [{}]", err, err.code());
    }
    error_response(err.http_status(), ErrorCode::from(err), err.client_message())
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(result: Result<T, LeanurlsError>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_leanurls(&e),
    }
}

impl ResponseError for LeanurlsError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        error_from_leanurls(self)
    }
}

/// Renders malformed JSON bodies in the standard envelope.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    LeanurlsError::validation(format!("Invalid JSON body: {}", err)).into()
}

/// Renders malformed query strings (unknown filter field, bad date, ...)
/// in the standard envelope.
pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    LeanurlsError::validation(format!("Invalid query: {}", err)).into()
}

/// Renders malformed path segments (non-numeric ids) in the standard envelope.
pub fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    LeanurlsError::validation(format!("Invalid path: {}", err)).into()
}
