//! 认证控制器
//!
//! 负责把提供方的认证结果转换为 `Session`：
//! 1. 登录 / 注册 / 登出委托给 `AuthProvider`
//! 2. 按 `user_id` 查询员工记录以确定角色，不存在时自动创建（默认 `employee`）
//! 3. 查询或创建失败时降级为 `employee`，不让会话失败

use crate::clock::Clock;
use crate::error::{ErrorKind, GatewayError, GatewayResult};
use crate::provider::{AuthEvents, AuthProvider};
use crate::repository::Repository;
use crate::session::Session;
use hrms_shared::protocol::{AuthEvent, Identity, SignUpResponse};
use hrms_shared::{EmployeeRecord, NewEmployee, PG_UNIQUE_VIOLATION, Role};
use std::rc::Rc;

/// 注册结果：需要邮件确认时没有会话
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpOutcome {
    pub session: Session,
    pub confirmation_required: bool,
}

/// 登出结果：会话总是变为匿名，远端错误单独报告
#[derive(Debug, Clone)]
pub struct SignOutOutcome {
    pub session: Session,
    pub remote_error: Option<GatewayError>,
}

pub struct AuthController<P, R> {
    provider: Rc<P>,
    repo: Rc<R>,
    clock: Rc<dyn Clock>,
}

impl<P, R> Clone for AuthController<P, R> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            repo: self.repo.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<P: AuthProvider, R: Repository> AuthController<P, R> {
    pub fn new(provider: Rc<P>, repo: Rc<R>, clock: Rc<dyn Clock>) -> Self {
        Self {
            provider,
            repo,
            clock,
        }
    }

    pub fn subscribe(&self) -> AuthEvents {
        self.provider.subscribe()
    }

    /// 启动时恢复会话；任何失败都落到匿名
    pub async fn initialize(&self) -> Session {
        match self.provider.restore_session().await {
            Ok(Some(session)) => self.resolve_session(&session.user).await,
            Ok(None) => Session::Anonymous,
            Err(e) => {
                log_error!("session restore failed: {}", e);
                Session::Anonymous
            }
        }
    }

    /// 每个认证事件都产生一个新的会话值
    pub async fn handle_event(&self, event: &AuthEvent) -> Session {
        match event.session() {
            Some(session) => self.resolve_session(&session.user).await,
            None => Session::Anonymous,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> GatewayResult<Session> {
        let session = self
            .provider
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| e.in_op("auth.sign_in"))?;
        Ok(self.resolve_session(&session.user).await)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> GatewayResult<SignUpOutcome> {
        let response = self
            .provider
            .sign_up(email, password)
            .await
            .map_err(|e| e.in_op("auth.sign_up"))?;
        match response {
            SignUpResponse::Session(session) => Ok(SignUpOutcome {
                session: self.resolve_session(&session.user).await,
                confirmation_required: false,
            }),
            SignUpResponse::User(identity) => {
                // 尚未确认邮箱也先建立员工记录
                self.resolve_role(&identity).await;
                Ok(SignUpOutcome {
                    session: Session::Anonymous,
                    confirmation_required: true,
                })
            }
        }
    }

    pub async fn sign_out(&self) -> SignOutOutcome {
        let remote_error = self.provider.sign_out().await.err();
        if let Some(e) = &remote_error {
            log_warn!("remote sign-out failed, local session cleared anyway: {}", e);
        }
        SignOutOutcome {
            session: Session::Anonymous,
            remote_error,
        }
    }

    pub async fn resolve_session(&self, identity: &Identity) -> Session {
        let (role, employee) = self.resolve_role(identity).await;
        log_info!("session resolved for {} as {}", identity.id, role);
        Session::Authenticated {
            identity: identity.clone(),
            role,
            employee,
        }
    }

    /// 查询失败时降级为最低权限
    pub async fn resolve_role(&self, identity: &Identity) -> (Role, Option<EmployeeRecord>) {
        match self.lookup_or_provision(identity).await {
            Ok(record) => (record.effective_role(), Some(record)),
            Err(e) => {
                log_error!("role resolution failed, defaulting to employee: {}", e);
                (Role::Employee, None)
            }
        }
    }

    async fn lookup_or_provision(&self, identity: &Identity) -> GatewayResult<EmployeeRecord> {
        if let Some(record) = self.repo.find_employee_by_user(identity.id).await? {
            return Ok(record);
        }

        let new = NewEmployee::provision(identity.id, identity.email.as_deref(), self.clock.today());
        log_info!(
            "provisioning employee record for {} ({} {})",
            identity.id,
            new.first_name,
            new.last_name
        );
        match self.repo.insert_employee(&new).await {
            Ok(record) => Ok(record),
            // 并发登录时另一方已创建
            Err(e) if e.kind == ErrorKind::Conflict && e.code() == Some(PG_UNIQUE_VIOLATION) => {
                self.repo
                    .find_employee_by_user(identity.id)
                    .await?
                    .ok_or_else(|| e.in_op("auth.provision"))
            }
            Err(e) => Err(e.in_op("auth.provision")),
        }
    }
}
