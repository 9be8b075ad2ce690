//! 请假申请表单
//!
//! 本地校验通过后插入一条 `pending` 记录；校验失败不发出任何请求。

use crate::error::{GatewayError, GatewayResult};
use crate::repository::Repository;
use hrms_shared::date::DateRange;
use hrms_shared::{EmployeeId, LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest};

pub const INVALID_RANGE_MESSAGE: &str = "Please select valid start and end dates.";

/// 表单原始输入（日期为 `YYYY-MM-DD` 字符串，可能为空）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveDraft {
    pub leave_type: LeaveType,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
}

impl LeaveDraft {
    pub fn validate(&self, employee_id: EmployeeId) -> GatewayResult<NewLeaveRequest> {
        let range = DateRange::parse(&self.start_date, &self.end_date)
            .map_err(|_| GatewayError::validation(INVALID_RANGE_MESSAGE))?;
        let reason = self.reason.trim();
        Ok(NewLeaveRequest {
            employee_id,
            leave_type: self.leave_type,
            start_date: range.start(),
            end_date: range.end(),
            reason: (!reason.is_empty()).then(|| reason.to_string()),
            status: LeaveStatus::Pending,
        })
    }
}

/// 提交申请；成功后清空表单并调用 `on_submitted`（通常为父组件重新拉取）
pub async fn submit<R, F>(
    repo: &R,
    employee_id: EmployeeId,
    draft: &mut LeaveDraft,
    on_submitted: F,
) -> GatewayResult<LeaveRequest>
where
    R: Repository + ?Sized,
    F: FnOnce(&LeaveRequest),
{
    let request = draft.validate(employee_id)?;
    let created = repo.insert_request(&request).await.map_err(|e| {
        log_error!("leave request submission failed: {}", e);
        e.in_op("leave.submit")
    })?;
    log_info!(
        "leave request {} submitted ({} to {})",
        created.id,
        created.start_date,
        created.end_date
    );
    *draft = LeaveDraft::default();
    on_submitted(&created);
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::repository::tests::MockRepository;
    use std::cell::Cell;
    use uuid::Uuid;

    fn draft(start: &str, end: &str) -> LeaveDraft {
        LeaveDraft {
            leave_type: LeaveType::Sick,
            start_date: start.into(),
            end_date: end.into(),
            reason: "  ".into(),
        }
    }

    #[tokio::test]
    async fn test_inverted_range_never_hits_network() {
        let repo = MockRepository::new();
        let called = Cell::new(false);
        let mut form = draft("2024-01-05", "2024-01-01");

        let err = submit(&repo, Uuid::new_v4(), &mut form, |_| called.set(true))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message(), INVALID_RANGE_MESSAGE);
        assert!(repo.calls().is_empty());
        assert!(!called.get());
        // 失败时保留输入
        assert_eq!(form.start_date, "2024-01-05");
    }

    #[tokio::test]
    async fn test_missing_or_garbled_dates_are_rejected() {
        let repo = MockRepository::new();
        for (start, end) in [("", "2024-01-01"), ("2024-01-01", ""), ("yesterday", "2024-01-01")] {
            let err = submit(&repo, Uuid::new_v4(), &mut draft(start, end), |_| {})
                .await
                .unwrap_err();
            assert_eq!(err.message(), INVALID_RANGE_MESSAGE);
        }
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_valid_submission_inserts_pending_and_resets() {
        let repo = MockRepository::new();
        let employee_id = Uuid::new_v4();
        let called = Cell::new(false);
        let mut form = draft("2024-01-01", "2024-01-01");

        let created = submit(&repo, employee_id, &mut form, |_| called.set(true))
            .await
            .unwrap();
        assert_eq!(created.status, LeaveStatus::Pending);
        assert_eq!(created.employee_id, employee_id);
        assert_eq!(created.leave_type, LeaveType::Sick);
        assert_eq!(created.reason, None);
        assert!(called.get());
        assert_eq!(form, LeaveDraft::default());
    }

    #[tokio::test]
    async fn test_remote_error_is_surfaced_verbatim() {
        let repo = MockRepository::new();
        repo.fail_on("insert_request");
        let called = Cell::new(false);
        let mut form = draft("2024-01-01", "2024-01-03");

        let err = submit(&repo, Uuid::new_v4(), &mut form, |_| called.set(true))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "simulated failure in insert_request");
        assert!(!called.get());
        assert_eq!(form.end_date, "2024-01-03");
    }
}
