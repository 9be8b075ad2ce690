use crate::auth::{sign_in, sign_up, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    SignIn,
    SignUp,
}

/// 登录 / 注册页
///
/// 成功后无需手动跳转：路由服务监听会话变化，按角色进入对应面板。
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let (mode, set_mode) = signal(Mode::SignIn);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (info_msg, set_info_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);
        set_info_msg.set(None);

        let (email, password) = (email.get(), password.get());
        let current = mode.get();
        spawn_local(async move {
            match current {
                Mode::SignIn => {
                    if let Err(msg) = sign_in(&auth, email, password).await {
                        set_error_msg.set(Some(msg));
                    }
                }
                Mode::SignUp => match sign_up(&auth, email, password).await {
                    Ok(true) => {
                        set_info_msg.set(Some(
                            "Check your email to confirm your account.".to_string(),
                        ));
                        set_mode.set(Mode::SignIn);
                    }
                    Ok(false) => {}
                    Err(msg) => set_error_msg.set(Some(msg)),
                },
            }
            set_is_submitting.set(false);
        });
    };

    let toggle_mode = move |_| {
        set_error_msg.set(None);
        set_info_msg.set(None);
        set_mode.update(|m| {
            *m = match m {
                Mode::SignIn => Mode::SignUp,
                Mode::SignUp => Mode::SignIn,
            }
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"HRMS"</h1>
                    <p class="text-base-content/70">
                        {move || match mode.get() {
                            Mode::SignIn => "Sign in to your account",
                            Mode::SignUp => "Create a new account",
                        }}
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>
                        <Show when=move || info_msg.get().is_some()>
                            <div role="status" class="alert alert-info text-sm py-2">
                                <span>{move || info_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@company.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || match (is_submitting.get(), mode.get()) {
                                    (true, _) => view! { <span class="loading loading-spinner"></span> "Please wait..." }.into_any(),
                                    (false, Mode::SignIn) => "Sign In".into_any(),
                                    (false, Mode::SignUp) => "Sign Up".into_any(),
                                }}
                            </button>
                        </div>
                        <button type="button" class="btn btn-link btn-sm" on:click=toggle_mode>
                            {move || match mode.get() {
                                Mode::SignIn => "Don't have an account? Sign up",
                                Mode::SignUp => "Already have an account? Sign in",
                            }}
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
