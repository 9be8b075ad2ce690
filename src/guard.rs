//! 路由守卫
//!
//! 纯函数：每次导航与会话变化时重新求值。

use crate::route::AppRoute;
use crate::session::Session;
use hrms_shared::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// 会话仍在加载，既不渲染也不跳转
    Placeholder,
    Redirect(AppRoute),
}

/// 判断当前会话能否访问受 `required` 约束的页面
///
/// - 加载中 -> 占位
/// - 无会话 -> 登录页
/// - 角色不在 `required` 中 -> `/unauthorized`
pub fn authorize(session: &Session, required: Option<&[Role]>) -> GuardDecision {
    match session {
        Session::Loading => GuardDecision::Placeholder,
        Session::Anonymous => GuardDecision::Redirect(AppRoute::Landing),
        Session::Authenticated { role, .. } => match required {
            Some(roles) if !roles.contains(role) => GuardDecision::Redirect(AppRoute::Unauthorized),
            _ => GuardDecision::Render,
        },
    }
}

/// 针对具体路由求值；`/` 对已登录用户按角色跳转
pub fn resolve(session: &Session, route: AppRoute) -> GuardDecision {
    match (route, session) {
        (_, Session::Loading) => GuardDecision::Placeholder,
        (AppRoute::Landing, Session::Authenticated { role, .. }) => {
            GuardDecision::Redirect(AppRoute::home_for(*role))
        }
        (AppRoute::Landing | AppRoute::Unauthorized, _) => GuardDecision::Render,
        (route, session) => authorize(session, route.required_roles()),
    }
}
