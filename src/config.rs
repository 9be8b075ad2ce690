//! 网关配置
//!
//! 仅两个值：项目 URL 与公开 anon key。缺失时记录错误但不中断启动。

use hrms_shared::protocol::PATH_REST;

pub const ENV_URL: &str = "SUPABASE_URL";
pub const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GatewayConfig {
    pub url: String,
    pub anon_key: String,
}

impl GatewayConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim().trim_end_matches('/').to_string(),
            anon_key: anon_key.into().trim().to_string(),
        }
    }

    /// 通过查找函数构造（进程环境、编译期变量、测试桩均可）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::new(
            lookup(ENV_URL).unwrap_or_default(),
            lookup(ENV_ANON_KEY).unwrap_or_default(),
        );
        if !config.is_complete() {
            log_error!(
                "Supabase URL or key is missing. Set {} and {}.",
                ENV_URL,
                ENV_ANON_KEY
            );
        }
        config
    }

    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }

    /// 拼接 Auth 路径（path 可带固定 query）
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.url, path)
        } else {
            format!("{}/{}", self.url, path)
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}{}/{}", self.url, PATH_REST, table)
    }
}
