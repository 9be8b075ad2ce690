//! 面板读模型（挂载时拉取，变更后整体重新拉取）

use crate::error::{GatewayError, GatewayResult};
use crate::repository::Repository;
use hrms_shared::turnover::TurnoverSummary;
use hrms_shared::{EmployeeRecord, LeaveBalance, LeaveRequest, LeaveStatus};
use uuid::Uuid;

pub const EMPLOYEE_NOT_FOUND: &str = "Employee record not found.";

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDashboard {
    pub employee: EmployeeRecord,
    pub balances: Vec<LeaveBalance>,
    pub pending: Vec<LeaveRequest>,
}

impl EmployeeDashboard {
    pub async fn load<R: Repository + ?Sized>(repo: &R, user_id: Uuid) -> GatewayResult<Self> {
        let op = "dashboard.employee";
        let employee = repo
            .find_employee_by_user(user_id)
            .await
            .map_err(|e| e.in_op(op))?
            .ok_or_else(|| GatewayError::not_found(EMPLOYEE_NOT_FOUND).in_op(op))?;

        let balances = repo
            .list_balances(employee.id)
            .await
            .map_err(|e| e.in_op(op))?;
        let pending = repo
            .list_requests(employee.id, LeaveStatus::Pending)
            .await
            .map_err(|e| e.in_op(op))?;

        Ok(Self {
            employee,
            balances,
            pending,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminDashboard {
    pub turnover: TurnoverSummary,
    /// 附带员工姓名
    pub pending: Vec<LeaveRequest>,
}

impl AdminDashboard {
    pub async fn load<R: Repository + ?Sized>(repo: &R) -> GatewayResult<Self> {
        let op = "dashboard.admin";
        let employees = repo.list_employees().await.map_err(|e| e.in_op(op))?;
        let offboarding = repo
            .list_offboarding_tasks()
            .await
            .map_err(|e| e.in_op(op))?;
        let pending = repo
            .list_requests_with_employee(LeaveStatus::Pending)
            .await
            .map_err(|e| e.in_op(op))?;

        Ok(Self {
            turnover: TurnoverSummary::compute(employees.len(), offboarding.len()),
            pending,
        })
    }

    pub fn rate_display(&self) -> String {
        format!("{:.2}", self.turnover.rate_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::tests::MockRepository;
    use chrono::NaiveDate;
    use hrms_shared::{LeaveType, NewLeaveRequest, OffboardingTask, Role};

    async fn file_request(repo: &MockRepository, employee: &EmployeeRecord) -> LeaveRequest {
        repo.insert_request(&NewLeaveRequest {
            employee_id: employee.id,
            leave_type: LeaveType::Vacation,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            reason: Some("trip".into()),
            status: LeaveStatus::Pending,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_turnover_ten_employees_two_offboarded() {
        let repo = MockRepository::new();
        for _ in 0..10 {
            repo.seed_employee(Uuid::new_v4(), None);
        }
        for _ in 0..2 {
            repo.offboarding.borrow_mut().push(OffboardingTask {
                employee_id: Uuid::new_v4(),
            });
        }

        let dashboard = AdminDashboard::load(&repo).await.unwrap();
        assert_eq!(dashboard.turnover.total_employees, 10);
        assert_eq!(dashboard.turnover.offboarded, 2);
        assert_eq!(dashboard.turnover.rate_percent, 20.0);
        assert_eq!(dashboard.rate_display(), "20.00");
    }

    #[tokio::test]
    async fn test_admin_pending_list_carries_names() {
        let repo = MockRepository::new();
        let employee = repo.seed_employee(Uuid::new_v4(), None);
        file_request(&repo, &employee).await;

        let dashboard = AdminDashboard::load(&repo).await.unwrap();
        assert_eq!(dashboard.pending.len(), 1);
        assert_eq!(dashboard.pending[0].employee_name(), "Seed Employee");
    }

    #[tokio::test]
    async fn test_employee_dashboard_lists_only_pending() {
        let repo = MockRepository::new();
        let user_id = Uuid::new_v4();
        let employee = repo.seed_employee(user_id, Some(Role::Employee));
        let kept = file_request(&repo, &employee).await;
        let decided = file_request(&repo, &employee).await;
        repo.transition_request(decided.id, LeaveStatus::Pending, LeaveStatus::Approved)
            .await
            .unwrap();

        let dashboard = EmployeeDashboard::load(&repo, user_id).await.unwrap();
        assert_eq!(dashboard.employee.id, employee.id);
        assert_eq!(dashboard.pending.len(), 1);
        assert_eq!(dashboard.pending[0].id, kept.id);
        assert!(dashboard.balances.is_empty());
    }

    #[tokio::test]
    async fn test_missing_employee_record() {
        let repo = MockRepository::new();
        let err = EmployeeDashboard::load(&repo, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.message(), EMPLOYEE_NOT_FOUND);
        assert_eq!(repo.count_calls("list_balances"), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_aborts_load() {
        let repo = MockRepository::new();
        repo.fail_on("list_offboarding_tasks");
        let err = AdminDashboard::load(&repo).await.unwrap_err();
        assert_eq!(err.error_code(), "REMOTE");
        assert_eq!(repo.count_calls("list_requests_with_employee"), 0);
    }
}
