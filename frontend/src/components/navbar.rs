use crate::auth::{sign_out, use_auth};
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 面板页头：标题、当前用户、登出
#[component]
pub fn Navbar(#[prop(into)] title: String) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let display_name = move || auth.session.with(|s| s.display_name());

    let on_sign_out = move |_| {
        spawn_local(async move {
            if let Some(msg) = sign_out(&auth).await {
                hrms::log_warn!("sign out reported: {}", msg);
            }
        });
    };

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <a class="btn btn-ghost text-xl" on:click=move |_| router.navigate("/")>{title}</a>
                <span class="badge badge-neutral hidden md:inline-flex">{display_name}</span>
            </div>
            <div class="flex-none">
                <button on:click=on_sign_out class="btn btn-outline btn-error">
                    "Sign Out"
                </button>
            </div>
        </div>
    }
}
