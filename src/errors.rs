use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Body returned for every failed API call
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnaplinkError {
    InvalidUrl(String),
    DuplicateCode(String),
    Validation(String),
    NotFound(String),
    Internal(String),
    FileOperation(String),
    Serialization(String),
    Config(String),
}

impl SnaplinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SnaplinkError::InvalidUrl(_) => "E001",
            SnaplinkError::DuplicateCode(_) => "E002",
            SnaplinkError::Validation(_) => "E003",
            SnaplinkError::NotFound(_) => "E004",
            SnaplinkError::Internal(_) => "E005",
            SnaplinkError::FileOperation(_) => "E006",
            SnaplinkError::Serialization(_) => "E007",
            SnaplinkError::Config(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SnaplinkError::InvalidUrl(_) => "Invalid URL",
            SnaplinkError::DuplicateCode(_) => "Duplicate Code",
            SnaplinkError::Validation(_) => "Validation Error",
            SnaplinkError::NotFound(_) => "Resource Not Found",
            SnaplinkError::Internal(_) => "Internal Error",
            SnaplinkError::FileOperation(_) => "File Operation Error",
            SnaplinkError::Serialization(_) => "Serialization Error",
            SnaplinkError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SnaplinkError::InvalidUrl(msg)
            | SnaplinkError::DuplicateCode(msg)
            | SnaplinkError::Validation(msg)
            | SnaplinkError::NotFound(msg)
            | SnaplinkError::Internal(msg)
            | SnaplinkError::FileOperation(msg)
            | SnaplinkError::Serialization(msg)
            | SnaplinkError::Config(msg) => msg,
        }
    }

    /// HTTP status a handler answers with for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            SnaplinkError::InvalidUrl(_)
            | SnaplinkError::DuplicateCode(_)
            | SnaplinkError::Validation(_) => StatusCode::BAD_REQUEST,
            SnaplinkError::NotFound(_) => StatusCode::NOT_FOUND,
            SnaplinkError::Internal(_)
            | SnaplinkError::FileOperation(_)
            | SnaplinkError::Serialization(_)
            | SnaplinkError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the message may be shown to API clients
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// 格式化为彩色输出（用于启动失败时打印）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SnaplinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SnaplinkError {}

impl ResponseError for SnaplinkError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_client_error() {
            self.message().to_string()
        } else {
            // 内部错误只记录日志，不向客户端泄露细节
            tracing::error!(code = self.code(), "{}", self.format_simple());
            INTERNAL_ERROR_MESSAGE.to_string()
        };

        HttpResponse::build(self.http_status())
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ErrorBody { error: message })
    }
}

// 便捷的构造函数
impl SnaplinkError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::InvalidUrl(msg.into())
    }

    pub fn duplicate_code<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::DuplicateCode(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::NotFound(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Internal(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Config(msg.into())
    }
}

impl From<std::io::Error> for SnaplinkError {
    fn from(err: std::io::Error) -> Self {
        SnaplinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SnaplinkError {
    fn from(err: serde_json::Error) -> Self {
        SnaplinkError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for SnaplinkError {
    fn from(err: config::ConfigError) -> Self {
        SnaplinkError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SnaplinkError {
    fn from(err: toml::ser::Error) -> Self {
        SnaplinkError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SnaplinkError>;
