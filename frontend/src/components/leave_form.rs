mod form_state;

use crate::auth::use_auth;
use form_state::FormState;
use hrms_shared::{EmployeeId, LeaveType};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 请假申请表单
///
/// 校验在本地完成；提交成功后清空表单并调用 `on_submitted`。
#[component]
pub fn LeaveForm(
    employee_id: EmployeeId,
    #[prop(into)] on_submitted: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();
    let form = FormState::new();
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let mut draft = form.to_draft();
        let gateway = auth.gateway();
        spawn_local(async move {
            let result =
                hrms::leave::submit(gateway.as_ref(), employee_id, &mut draft, |_| {}).await;
            match result {
                Ok(_) => {
                    form.load(&draft);
                    on_submitted.run(());
                }
                Err(e) => set_error_msg.set(Some(e.message().to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body" on:submit=on_submit>
                <h3 class="card-title">"Request Leave"</h3>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <div class="form-control">
                    <label class="label" for="leave-type">
                        <span class="label-text">"Leave Type"</span>
                    </label>
                    <select
                        id="leave-type"
                        class="select select-bordered"
                        on:change=move |ev| {
                            if let Some(t) = LeaveType::parse(&event_target_value(&ev)) {
                                form.leave_type.set(t);
                            }
                        }
                        prop:value=move || form.leave_type.get().as_str()
                    >
                        {LeaveType::ALL
                            .into_iter()
                            .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
                            .collect_view()}
                    </select>
                </div>

                <div class="grid grid-cols-2 gap-4">
                    <div class="form-control">
                        <label class="label" for="start-date">
                            <span class="label-text">"Start Date"</span>
                        </label>
                        <input
                            id="start-date"
                            type="date"
                            class="input input-bordered"
                            on:input=move |ev| form.start_date.set(event_target_value(&ev))
                            prop:value=form.start_date
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="end-date">
                            <span class="label-text">"End Date"</span>
                        </label>
                        <input
                            id="end-date"
                            type="date"
                            class="input input-bordered"
                            on:input=move |ev| form.end_date.set(event_target_value(&ev))
                            prop:value=form.end_date
                        />
                    </div>
                </div>

                <div class="form-control">
                    <label class="label" for="reason">
                        <span class="label-text">"Reason"</span>
                    </label>
                    <textarea
                        id="reason"
                        class="textarea textarea-bordered"
                        on:input=move |ev| form.reason.set(event_target_value(&ev))
                        prop:value=form.reason
                    ></textarea>
                </div>

                <div class="form-control mt-4">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Submitting..." }.into_any()
                        } else {
                            "Submit Request".into_any()
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}
