use crate::auth::use_auth;
use crate::components::navbar::Navbar;
use hrms::approval::{self, ApprovalOutcome, Decision};
use hrms::dashboard::AdminDashboard;
use hrms::route::AppRoute;
use hrms_shared::RequestId;
use hrms_shared::turnover::{LABEL_RATE, TurnoverSummary};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 流失率柱状图：每个数据点按最大值等比缩放
#[component]
fn TurnoverChart(summary: TurnoverSummary) -> impl IntoView {
    let points = summary.chart_points();
    let max = points
        .iter()
        .map(|(_, v)| *v)
        .fold(1.0_f64, f64::max);

    view! {
        <div class="space-y-3">
            {points
                .into_iter()
                .map(|(label, value)| {
                    let width = format!("width: {:.1}%", value / max * 100.0);
                    let shown = if label == LABEL_RATE {
                        format!("{:.2}", value)
                    } else {
                        format!("{}", value as u64)
                    };
                    view! {
                        <div>
                            <div class="flex justify-between text-sm">
                                <span>{label}</span>
                                <span class="font-mono">{shown}</span>
                            </div>
                            <div class="w-full bg-base-200 rounded h-4">
                                <div class="bg-primary rounded h-4" style=width></div>
                            </div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn HrDashboardPage() -> impl IntoView {
    let auth = use_auth();

    let (data, set_data) = signal(Option::<AdminDashboard>::None);
    let (loading, set_loading) = signal(true);
    let (busy, set_busy) = signal(Option::<RequestId>::None);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let load = move || {
        let gateway = auth.gateway();
        set_loading.set(true);
        spawn_local(async move {
            match AdminDashboard::load(gateway.as_ref()).await {
                Ok(dashboard) => set_data.set(Some(dashboard)),
                Err(e) => {
                    hrms::log_error!("admin dashboard load failed: {}", e);
                    set_notification.set(Some((e.message().to_string(), true)));
                }
            }
            set_loading.set(false);
        });
    };

    // 挂载时加载
    Effect::new(move |_| load());

    let decide = move |id: RequestId, decision: Decision| {
        let gateway = auth.gateway();
        set_busy.set(Some(id));
        spawn_local(async move {
            match approval::decide(gateway.as_ref(), id, decision).await {
                Ok(ApprovalOutcome::Applied { .. }) => {
                    let msg = match decision {
                        Decision::Approve => "Leave request approved.",
                        Decision::Reject => "Leave request rejected.",
                    };
                    set_notification.set(Some((msg.to_string(), false)));
                }
                Ok(ApprovalOutcome::AlreadyDecided(_)) => {
                    set_notification.set(Some(("Leave request was already processed.".to_string(), false)));
                }
                Err(e) => {
                    hrms::log_error!("decision failed: {}", e);
                    set_notification.set(Some((e.message().to_string(), true)));
                }
            }
            set_busy.set(None);
            // 无论结果如何都整体重新拉取
            load();
        });
    };

    // 3 秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    let pending = move || data.with(|d| d.as_ref().map(|d| d.pending.clone()).unwrap_or_default());
    let turnover = move || data.with(|d| d.as_ref().map(|d| d.turnover));

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Show when=move || notification.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || {
                            match notification.get() {
                                Some((_, true)) => "alert alert-error shadow-lg",
                                _ => "alert alert-success shadow-lg",
                            }
                        }>
                            <span>{move || notification.get().map(|(m, _)| m).unwrap_or_default()}</span>
                        </div>
                    </div>
                </Show>

                <Navbar title=AppRoute::HrAdminDashboard.title() />

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Total Employees"</div>
                        <div class="stat-value text-primary">
                            {move || turnover().map(|t| t.total_employees).unwrap_or_default()}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Offboarded"</div>
                        <div class="stat-value">
                            {move || turnover().map(|t| t.offboarded).unwrap_or_default()}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Turnover Rate"</div>
                        <div class="stat-value text-secondary">
                            {move || data.with(|d| d.as_ref().map(|d| format!("{}%", d.rate_display())).unwrap_or_default())}
                        </div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"Employee Turnover"</h3>
                        {move || turnover().map(|summary| view! { <TurnoverChart summary=summary /> })}
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="p-6 pb-2">
                            <h3 class="card-title">"Pending Leave Requests"</h3>
                        </div>
                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"Employee"</th>
                                        <th>"Type"</th>
                                        <th>"Dates"</th>
                                        <th class="hidden md:table-cell">"Days"</th>
                                        <th class="hidden md:table-cell">"Reason"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || pending().is_empty() && !loading.get()>
                                        <tr>
                                            <td colspan="6" class="text-center py-8 text-base-content/50">
                                                "No pending requests."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=pending
                                        key=|r| r.id
                                        children=move |r| {
                                            let id = r.id;
                                            let is_busy = move || busy.get() == Some(id);
                                            view! {
                                                <tr>
                                                    <td>{r.employee_name()}</td>
                                                    <td>{r.leave_type.label()}</td>
                                                    <td>{r.range().to_string()}</td>
                                                    <td class="hidden md:table-cell">{r.range().day_count()}</td>
                                                    <td class="hidden md:table-cell">{r.reason.clone().unwrap_or_default()}</td>
                                                    <td class="flex gap-2 justify-end">
                                                        <button
                                                            class="btn btn-success btn-sm"
                                                            disabled=is_busy
                                                            on:click=move |_| decide(id, Decision::Approve)
                                                        >
                                                            "Approve"
                                                        </button>
                                                        <button
                                                            class="btn btn-error btn-sm"
                                                            disabled=is_busy
                                                            on:click=move |_| decide(id, Decision::Reject)
                                                        >
                                                            "Reject"
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
