use std::fmt;

use hrms_shared::{PG_UNIQUE_VIOLATION, PGRST_NO_ROWS};

// =========================================================
// 错误类别枚举
// =========================================================

/// 错误类别
/// 调用方据此决定提示方式；目前均不自动重试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 本地校验失败，从未发出网络请求
    Validation,
    /// 凭据无效 / 令牌过期 (401, 403, GoTrue 400)
    Auth,
    /// 预期内的缺失 (PGRST116)
    NotFound,
    /// 唯一约束冲突或非法状态迁移
    Conflict,
    /// 服务端返回的其他错误
    Remote,
    /// 网络层失败（fetch 失败、无 window 等）
    Network,
    /// 响应体无法解析
    Serialization,
    /// 缺少 URL / key
    Config,
}

impl ErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Auth => "AUTH",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Remote => "REMOTE",
            ErrorKind::Network => "NETWORK",
            ErrorKind::Serialization => "SERIALIZATION",
            ErrorKind::Config => "CONFIG",
        }
    }

    /// 根据 HTTP 状态码与服务端错误码归类
    pub fn classify(status: u16, code: Option<&str>) -> Self {
        match code {
            Some(PGRST_NO_ROWS) => return ErrorKind::NotFound,
            Some(PG_UNIQUE_VIOLATION) => return ErrorKind::Conflict,
            _ => {}
        }
        match status {
            401 | 403 => ErrorKind::Auth,
            404 | 406 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            _ => ErrorKind::Remote,
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "rest.select", "auth.sign_in"
    pub operation: String,
    /// 额外的细节信息，如表名、记录 id
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 网关统一错误
///
/// - kind: 错误类别
/// - message: 面向用户的消息（服务端消息原样保留）
/// - code: 服务端错误码（如 PGRST116 / invalid_credentials）
/// - spans: 结构化的调用追踪栈
#[derive(Debug, Clone)]
pub struct GatewayError {
    pub kind: ErrorKind,
    message: String,
    code: Option<String>,
    spans: Vec<ErrorSpan>,
}

impl GatewayError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Remote, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    // --- Context builders ---

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    /// 面向用户的消息（不含追踪栈）
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for GatewayError {}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::serialization(e.to_string())
    }
}

impl From<crate::request::HttpError> for GatewayError {
    fn from(e: crate::request::HttpError) -> Self {
        GatewayError::network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_trace() {
        let err = GatewayError::remote("boom")
            .in_op_with("rest.select", "employees")
            .in_op("auth.resolve_role");
        assert_eq!(
            err.to_string(),
            "[REMOTE] boom | trace: rest.select(employees) -> auth.resolve_role"
        );
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn test_classify() {
        assert_eq!(ErrorKind::classify(406, Some("PGRST116")), ErrorKind::NotFound);
        assert_eq!(ErrorKind::classify(409, Some("23505")), ErrorKind::Conflict);
        assert_eq!(ErrorKind::classify(401, None), ErrorKind::Auth);
        assert_eq!(ErrorKind::classify(500, Some("XX000")), ErrorKind::Remote);
    }
}
