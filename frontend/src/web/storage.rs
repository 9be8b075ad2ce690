//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口，并作为网关的会话持久化。

use hrms::provider::SessionPersistence;
use hrms_shared::protocol::AuthSession;

/// 提供方会话在 localStorage 中的键
const SESSION_KEY: &str = "hrms.auth.token";

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 键不存在或发生错误时返回 `None`
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 把提供方会话以 JSON 形式保存在 localStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistedSession;

impl SessionPersistence for PersistedSession {
    fn load(&self) -> Option<AuthSession> {
        let raw = BrowserStorage::get(SESSION_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                hrms::log_warn!("discarding unreadable stored session: {}", e);
                BrowserStorage::delete(SESSION_KEY);
                None
            }
        }
    }

    fn save(&self, session: &AuthSession) {
        match serde_json::to_string(session) {
            Ok(raw) => {
                if !BrowserStorage::set(SESSION_KEY, &raw) {
                    hrms::log_warn!("failed to persist session");
                }
            }
            Err(e) => hrms::log_error!("failed to serialize session: {}", e),
        }
    }

    fn clear(&self) {
        BrowserStorage::delete(SESSION_KEY);
    }
}
