//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API：所有对 window.history 的操作都集中在此模块。
//! 导航流程为"请求 -> 守卫 -> 处理 -> 加载"，守卫规则来自 `hrms::guard`。

use hrms::guard::{self, GuardDecision};
use hrms::route::AppRoute;
use hrms::session::Session;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 守卫最多连续重定向的次数（`/` -> 角色首页 -> `/unauthorized`）
const MAX_REDIRECTS: usize = 3;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 用于重定向，不留下历史记录
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 沿守卫的重定向链走到最终路由
fn settle(session: &Session, mut route: AppRoute) -> (AppRoute, bool) {
    let mut redirected = false;
    for _ in 0..MAX_REDIRECTS {
        match guard::resolve(session, route) {
            GuardDecision::Redirect(next) if next != route => {
                hrms::log_info!("[Router] {} -> {}", route, next);
                route = next;
                redirected = true;
            }
            _ => break,
        }
    }
    (route, redirected)
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；会话信号由外部注入。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    session: Signal<Session>,
}

impl RouterService {
    fn new(session: Signal<Session>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn session(&self) -> Signal<Session> {
        self.session
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        let target = AppRoute::from_path(path);
        let (route, _) = settle(&self.session.get_untracked(), target);
        push_history_state(route.to_path());
        self.set_route.set(route);
    }

    /// 浏览器后退/前进时同样经过守卫
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let session = self.session;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            let (route, redirected) = settle(&session.get_untracked(), target);
            if redirected {
                replace_history_state(route.to_path());
            }
            set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 监听器与页面同寿命
        closure.forget();
    }

    /// 会话变化（加载完成、登录、登出、角色变化）时重新求值当前路由
    fn setup_session_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session = self.session;

        Effect::new(move |_| {
            let session = session.get();
            let route = current_route.get_untracked();
            let (next, redirected) = settle(&session, route);
            if redirected {
                replace_history_state(next.to_path());
                set_route.set(next);
            } else if route.to_path() != current_path() {
                // 未匹配路径回到 `/`
                replace_history_state(route.to_path());
            }
        });
    }
}

fn provide_router(session: Signal<Session>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件，应在 App 根部使用
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Session>,
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 守卫判定为渲染时才调用 `matcher`；加载中或等待重定向时显示占位。
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let route = router.current_route().get();
        match router.session().with(|s| guard::resolve(s, route)) {
            GuardDecision::Render => matcher(route),
            GuardDecision::Placeholder | GuardDecision::Redirect(_) => view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any(),
        }
    }
}
