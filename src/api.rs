//! Supabase 网关
//!
//! 一个配置好的客户端同时承担认证 (GoTrue) 与表查询 (PostgREST)。
//! 自身不持有业务状态，只保存提供方会话令牌。

use crate::clock::{Clock, SystemClock};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::provider::{AuthEventBus, MemoryPersistence, SessionPersistence};
use crate::request::{HttpClient, HttpMethod, HttpRequest};
use hrms_shared::protocol::AuthSession;
use std::cell::RefCell;

mod auth;
pub mod rest;
mod tables;

pub use rest::RestQuery;

pub struct SupabaseApi<C: HttpClient> {
    client: C,
    config: GatewayConfig,
    session: RefCell<Option<AuthSession>>,
    persistence: Box<dyn SessionPersistence>,
    clock: Box<dyn Clock>,
    events: AuthEventBus,
}

impl<C: HttpClient> SupabaseApi<C> {
    pub fn new(client: C, config: GatewayConfig) -> Self {
        Self {
            client,
            config,
            session: RefCell::new(None),
            persistence: Box::new(MemoryPersistence::default()),
            clock: Box::new(SystemClock),
            events: AuthEventBus::default(),
        }
    }

    pub fn with_persistence(mut self, persistence: impl SessionPersistence + 'static) -> Self {
        self.persistence = Box::new(persistence);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn current_session(&self) -> Option<AuthSession> {
        self.session.borrow().clone()
    }

    // =========================================================
    // 内部工具
    // =========================================================

    /// 已登录时使用用户令牌，否则退回 anon key
    fn bearer(&self) -> String {
        self.session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    fn base_request(&self, url: &str, method: HttpMethod) -> HttpRequest {
        HttpRequest::new(url, method)
            .with_header("apikey", &self.config.anon_key)
            .with_header("Authorization", &format!("Bearer {}", self.bearer()))
    }

    fn ensure_configured(&self, op: &str) -> GatewayResult<()> {
        if self.config.is_complete() {
            Ok(())
        } else {
            Err(GatewayError::config("Supabase URL or key is missing").in_op(op))
        }
    }

    fn store_session(&self, session: &AuthSession) {
        self.persistence.save(session);
        *self.session.borrow_mut() = Some(session.clone());
    }

    fn clear_session(&self) {
        self.persistence.clear();
        self.session.borrow_mut().take();
    }
}
