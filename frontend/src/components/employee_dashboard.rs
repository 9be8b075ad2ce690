use crate::auth::use_auth;
use crate::components::leave_form::LeaveForm;
use crate::components::navbar::Navbar;
use hrms::dashboard::EmployeeDashboard;
use hrms::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn EmployeeDashboardPage() -> impl IntoView {
    let auth = use_auth();

    let (data, set_data) = signal(Option::<EmployeeDashboard>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let load = move || {
        let Some(user_id) = auth.session.with_untracked(|s| s.identity().map(|i| i.id)) else {
            return;
        };
        let gateway = auth.gateway();
        set_loading.set(true);
        spawn_local(async move {
            match EmployeeDashboard::load(gateway.as_ref(), user_id).await {
                Ok(dashboard) => {
                    set_error_msg.set(None);
                    set_data.set(Some(dashboard));
                }
                Err(e) => {
                    hrms::log_error!("employee dashboard load failed: {}", e);
                    set_error_msg.set(Some(e.message().to_string()));
                }
            }
            set_loading.set(false);
        });
    };

    // 挂载时加载
    Effect::new(move |_| load());

    let balances = move || data.with(|d| d.as_ref().map(|d| d.balances.clone()).unwrap_or_default());
    let pending = move || data.with(|d| d.as_ref().map(|d| d.pending.clone()).unwrap_or_default());
    let employee_id = Memo::new(move |_| data.with(|d| d.as_ref().map(|d| d.employee.id)));

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-5xl mx-auto space-y-8">
                <Navbar title=AppRoute::EmployeeDashboard.title() />

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <Show when=move || loading.get() && data.with(Option::is_none)>
                    <div class="flex justify-center py-8">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"Leave Balances"</h3>
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Type"</th>
                                    <th>"Accrued"</th>
                                    <th>"Taken"</th>
                                    <th>"Remaining"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=balances
                                    key=|b| b.id
                                    children=|b| view! {
                                        <tr>
                                            <td>{b.leave_type.label()}</td>
                                            <td>{b.accrued_days}</td>
                                            <td>{b.taken_days}</td>
                                            <td class={if b.remaining_days < 0 { "text-error" } else { "" }}>
                                                {b.remaining_days}
                                            </td>
                                        </tr>
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"Pending Requests"</h3>
                        <Show
                            when=move || !pending().is_empty()
                            fallback=|| view! { <p class="text-base-content/50">"No pending requests."</p> }
                        >
                            <ul class="space-y-2">
                                <For
                                    each=pending
                                    key=|r| r.id
                                    children=|r| view! {
                                        <li class="flex justify-between">
                                            <span class="badge badge-outline">{r.leave_type.label()}</span>
                                            <span>{r.range().to_string()}</span>
                                            <span class="text-base-content/70">{r.reason.clone().unwrap_or_default()}</span>
                                        </li>
                                    }
                                />
                            </ul>
                        </Show>
                    </div>
                </div>

                {move || employee_id.get().map(|id| view! {
                    <LeaveForm employee_id=id on_submitted=move |_| load() />
                })}
            </div>
        </div>
    }
}
