//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState`，负责数据的持有、重置以及到 `LeaveDraft` 的转换。

use hrms::leave::LeaveDraft;
use hrms_shared::LeaveType;
use leptos::prelude::*;

/// 使用 `RwSignal` 因为它实现了 `Copy`，适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct FormState {
    pub leave_type: RwSignal<LeaveType>,
    pub start_date: RwSignal<String>,
    pub end_date: RwSignal<String>,
    pub reason: RwSignal<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            leave_type: RwSignal::new(LeaveType::default()),
            start_date: RwSignal::new(String::new()),
            end_date: RwSignal::new(String::new()),
            reason: RwSignal::new(String::new()),
        }
    }

    pub fn to_draft(&self) -> LeaveDraft {
        LeaveDraft {
            leave_type: self.leave_type.get_untracked(),
            start_date: self.start_date.get_untracked(),
            end_date: self.end_date.get_untracked(),
            reason: self.reason.get_untracked(),
        }
    }

    /// 用（可能已被清空的）草稿回写表单
    pub fn load(&self, draft: &LeaveDraft) {
        self.leave_type.set(draft.leave_type);
        self.start_date.set(draft.start_date.clone());
        self.end_date.set(draft.end_date.clone());
        self.reason.set(draft.reason.clone());
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
