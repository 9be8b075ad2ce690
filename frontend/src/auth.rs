//! 认证模块
//!
//! 持有当前 `Session` 信号与认证控制器，与路由系统解耦：
//! 路由服务只读取注入的会话信号。

use crate::api::{Controller, Gateway, build_controller, build_gateway};
use crate::web::Interval;
use futures::StreamExt;
use hrms::provider::AuthProvider;
use hrms::session::Session;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

/// 访问令牌刷新周期（令牌有效期通常为 1 小时）
const REFRESH_INTERVAL_MS: u32 = 10 * 60 * 1000;

/// 认证上下文
///
/// 全部字段都是句柄，可在组件间按值传递。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 每次认证状态变化整体替换
    pub session: RwSignal<Session>,
    gateway: StoredValue<Rc<Gateway>, LocalStorage>,
    controller: StoredValue<Controller, LocalStorage>,
}

impl AuthContext {
    pub fn new() -> Self {
        let gateway = build_gateway();
        let controller = build_controller(&gateway);
        Self {
            session: RwSignal::new(Session::Loading),
            gateway: StoredValue::new_local(gateway),
            controller: StoredValue::new_local(controller),
        }
    }

    /// 会话信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Session> {
        self.session.into()
    }

    pub fn gateway(&self) -> Rc<Gateway> {
        self.gateway.get_value()
    }

    fn controller(&self) -> Controller {
        self.controller.get_value()
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 1. 恢复已持久化的会话，结束 Loading
/// 2. 之后每个认证事件都重新解析会话
/// 3. 定期刷新访问令牌
pub fn init_auth(ctx: &AuthContext) {
    let ctx = *ctx;
    spawn_local(async move {
        let controller = ctx.controller();
        let session = controller.initialize().await;
        ctx.session.set(session);

        let mut events = controller.subscribe();
        while let Some(event) = events.next().await {
            let session = controller.handle_event(&event).await;
            ctx.session.set(session);
        }
    });

    let gateway = ctx.gateway();
    let refresher = Interval::new(REFRESH_INTERVAL_MS, move || {
        let gateway = gateway.clone();
        spawn_local(async move {
            if let Err(e) = gateway.refresh_session().await {
                hrms::log_warn!("token refresh failed: {}", e);
            }
        });
    });
    match refresher {
        // 随根 Owner 一起释放
        Some(interval) => {
            StoredValue::new_local(interval);
        }
        None => hrms::log_warn!("token refresh timer unavailable"),
    }
}

/// 登录；失败时返回提供方的错误消息
pub async fn sign_in(ctx: &AuthContext, email: String, password: String) -> Result<(), String> {
    match ctx.controller().sign_in(&email, &password).await {
        Ok(session) => {
            ctx.session.set(session);
            Ok(())
        }
        Err(e) => {
            hrms::log_error!("sign in failed: {}", e);
            Err(e.message().to_string())
        }
    }
}

/// 注册；返回是否需要邮件确认
pub async fn sign_up(ctx: &AuthContext, email: String, password: String) -> Result<bool, String> {
    match ctx.controller().sign_up(&email, &password).await {
        Ok(outcome) => {
            ctx.session.set(outcome.session);
            Ok(outcome.confirmation_required)
        }
        Err(e) => {
            hrms::log_error!("sign up failed: {}", e);
            Err(e.message().to_string())
        }
    }
}

/// 登出：本地会话总是清除；远端失败时返回其消息
///
/// 导航由路由服务监听会话变化自动完成。
pub async fn sign_out(ctx: &AuthContext) -> Option<String> {
    let outcome = ctx.controller().sign_out().await;
    ctx.session.set(outcome.session);
    outcome.remote_error.map(|e| e.message().to_string())
}
