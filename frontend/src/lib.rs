//! HRMS 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `hrms::route` / `hrms::guard`: 路由定义与守卫规则（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod employee_dashboard;
    pub mod hr_dashboard;
    mod leave_form;
    pub mod login;
    mod navbar;
}

use crate::auth::{AuthContext, init_auth, sign_out, use_auth};
use crate::components::employee_dashboard::EmployeeDashboardPage;
use crate::components::hr_dashboard::HrDashboardPage;
use crate::components::login::LoginPage;

use hrms::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod http;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::FetchClient;
    pub use storage::PersistedSession;
    pub use timer::Interval;
}

use web::router::{Router, RouterOutlet};

/// 角色不明或无权访问时的页面
#[component]
fn UnauthorizedPage() -> impl IntoView {
    let auth = use_auth();
    let on_sign_out = move |_| {
        spawn_local(async move {
            if let Some(msg) = sign_out(&auth).await {
                hrms::log_warn!("sign out reported: {}", msg);
            }
        });
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center space-y-4">
                <h1 class="text-5xl font-bold text-error">{AppRoute::Unauthorized.title()}</h1>
                <p class="text-lg">"Your account does not have access to this page."</p>
                <button class="btn btn-outline" on:click=on_sign_out>"Sign Out"</button>
            </div>
        </div>
    }
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LoginPage /> }.into_any(),
        AppRoute::EmployeeDashboard => view! { <EmployeeDashboardPage /> }.into_any(),
        AppRoute::HrAdminDashboard => view! { <HrDashboardPage /> }.into_any(),
        AppRoute::Unauthorized => view! { <UnauthorizedPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 恢复会话并订阅认证事件
    init_auth(&auth_ctx);

    // 3. 会话信号注入路由服务
    let session = auth_ctx.session_signal();

    view! {
        <Router session=session>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
