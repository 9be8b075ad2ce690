//! HRMS 核心库
//!
//! 平台无关（native / wasm32）的业务层：
//! - `request`: HTTP 抽象（由前端注入 fetch 实现）
//! - `api`: Supabase 网关（Auth + REST）
//! - `auth` / `session`: 认证控制器与不可变会话值
//! - `route` / `guard`: 路由表与守卫
//! - `leave` / `approval` / `dashboard`: 假期表单、审批流程、面板读模型

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
#[doc(hidden)]
pub use web_sys as __web_sys;

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => ($crate::__web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => ($crate::__web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => ($crate::__web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub mod api;
pub mod approval;
pub mod auth;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod leave;
pub mod provider;
pub mod repository;
pub mod request;
pub mod route;
pub mod session;

pub use api::SupabaseApi;
pub use auth::AuthController;
pub use config::GatewayConfig;
pub use error::{ErrorKind, GatewayError, GatewayResult};
pub use session::Session;

pub use hrms_shared as shared;
