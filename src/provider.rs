//! 认证提供方抽象
//!
//! `AuthController` 通过此 trait 与 GoTrue 交互；令牌持久化与事件广播
//! 也定义在这里，具体实现由运行环境注入。

use crate::error::GatewayResult;
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use hrms_shared::protocol::{AuthEvent, AuthSession, SignUpResponse};
use std::cell::RefCell;

pub type AuthEvents = UnboundedReceiver<AuthEvent>;

#[async_trait::async_trait(?Send)]
pub trait AuthProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str)
    -> GatewayResult<AuthSession>;
    async fn sign_up(&self, email: &str, password: &str) -> GatewayResult<SignUpResponse>;
    /// 撤销远端会话；无论结果如何，本地令牌都会被清除
    async fn sign_out(&self) -> GatewayResult<()>;
    /// 从持久化存储恢复会话（必要时刷新一次令牌）
    async fn restore_session(&self) -> GatewayResult<Option<AuthSession>>;
    /// 用刷新令牌换取新会话；未登录时返回 None。刷新令牌被拒绝时清除会话并广播 SignedOut
    async fn refresh_session(&self) -> GatewayResult<Option<AuthSession>>;
    /// 订阅认证事件；接收端被丢弃即视为取消订阅
    fn subscribe(&self) -> AuthEvents;
}

// =========================================================
// 令牌持久化
// =========================================================

/// 会话存储（浏览器中为 localStorage）
pub trait SessionPersistence {
    fn load(&self) -> Option<AuthSession>;
    fn save(&self, session: &AuthSession);
    fn clear(&self);
}

/// 仅存于内存，用于测试与非浏览器环境
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    slot: RefCell<Option<AuthSession>>,
}

impl SessionPersistence for MemoryPersistence {
    fn load(&self) -> Option<AuthSession> {
        self.slot.borrow().clone()
    }

    fn save(&self, session: &AuthSession) {
        *self.slot.borrow_mut() = Some(session.clone());
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}

// =========================================================
// 事件广播
// =========================================================

#[derive(Debug, Default)]
pub struct AuthEventBus {
    senders: RefCell<Vec<UnboundedSender<AuthEvent>>>,
}

impl AuthEventBus {
    pub fn subscribe(&self) -> AuthEvents {
        let (tx, rx) = unbounded();
        self.senders.borrow_mut().push(tx);
        rx
    }

    /// 广播事件，并顺带清理已关闭的订阅者
    pub fn emit(&self, event: AuthEvent) {
        log_info!("auth event: {}", event.name());
        self.senders
            .borrow_mut()
            .retain(|tx| tx.unbounded_send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.senders.borrow().len()
    }
}
