//! 数据仓库接口
//!
//! 业务层只依赖此 trait；生产实现为 `SupabaseApi`（PostgREST），
//! 测试中使用内存版 `MockRepository`。

use crate::error::GatewayResult;
use hrms_shared::{
    BalanceId, BalanceUpdate, EmployeeId, EmployeeRecord, EmployeeSummary, LeaveBalance,
    LeaveRequest, LeaveStatus, LeaveType, NewEmployee, NewLeaveBalance, NewLeaveRequest,
    OffboardingTask, RequestId,
};
use uuid::Uuid;

#[async_trait::async_trait(?Send)]
pub trait Repository {
    // employees
    async fn find_employee_by_user(&self, user_id: Uuid) -> GatewayResult<Option<EmployeeRecord>>;
    async fn insert_employee(&self, employee: &NewEmployee) -> GatewayResult<EmployeeRecord>;
    async fn list_employees(&self) -> GatewayResult<Vec<EmployeeSummary>>;

    // leaveBalances
    async fn list_balances(&self, employee_id: EmployeeId) -> GatewayResult<Vec<LeaveBalance>>;
    async fn find_balance(
        &self,
        employee_id: EmployeeId,
        leave_type: LeaveType,
    ) -> GatewayResult<Option<LeaveBalance>>;
    async fn update_balance(
        &self,
        id: BalanceId,
        update: BalanceUpdate,
    ) -> GatewayResult<LeaveBalance>;
    async fn insert_balance(&self, balance: &NewLeaveBalance) -> GatewayResult<LeaveBalance>;

    // leaveRequests
    async fn list_requests(
        &self,
        employee_id: EmployeeId,
        status: LeaveStatus,
    ) -> GatewayResult<Vec<LeaveRequest>>;
    /// 按状态列出，附带 `employees(firstName, lastName)`
    async fn list_requests_with_employee(
        &self,
        status: LeaveStatus,
    ) -> GatewayResult<Vec<LeaveRequest>>;
    async fn find_request(&self, id: RequestId) -> GatewayResult<Option<LeaveRequest>>;
    async fn insert_request(&self, request: &NewLeaveRequest) -> GatewayResult<LeaveRequest>;
    /// 条件更新：仅当当前状态为 `from` 时改为 `to`，无匹配行时返回 None
    async fn transition_request(
        &self,
        id: RequestId,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> GatewayResult<Option<LeaveRequest>>;

    // offboardingTasks
    async fn list_offboarding_tasks(&self) -> GatewayResult<Vec<OffboardingTask>>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::error::GatewayError;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// 内存仓库：记录调用日志，可按操作名注入失败
    pub struct MockRepository {
        pub employees: RefCell<Vec<EmployeeRecord>>,
        pub balances: RefCell<Vec<LeaveBalance>>,
        pub requests: RefCell<Vec<LeaveRequest>>,
        pub offboarding: RefCell<Vec<OffboardingTask>>,
        pub log: RefCell<Vec<String>>,
        /// 大于 0 时按次数让员工查询返回空（模拟并发创建）
        pub stale_lookups: RefCell<usize>,
        fail_ops: RefCell<HashSet<&'static str>>,
    }

    impl MockRepository {
        pub fn new() -> Self {
            Self {
                employees: RefCell::new(Vec::new()),
                balances: RefCell::new(Vec::new()),
                requests: RefCell::new(Vec::new()),
                offboarding: RefCell::new(Vec::new()),
                log: RefCell::new(Vec::new()),
                stale_lookups: RefCell::new(0),
                fail_ops: RefCell::new(HashSet::new()),
            }
        }

        /// 使指定操作返回远端错误
        pub fn fail_on(&self, op: &'static str) {
            self.fail_ops.borrow_mut().insert(op);
        }

        /// 撤销 `fail_on`
        pub fn recover(&self, op: &'static str) {
            self.fail_ops.borrow_mut().remove(op);
        }

        pub fn calls(&self) -> Vec<String> {
            self.log.borrow().clone()
        }

        pub fn count_calls(&self, op: &str) -> usize {
            self.log.borrow().iter().filter(|c| c.as_str() == op).count()
        }

        fn enter(&self, op: &'static str) -> GatewayResult<()> {
            self.log.borrow_mut().push(op.to_string());
            if self.fail_ops.borrow().contains(op) {
                return Err(GatewayError::remote(format!("simulated failure in {}", op)));
            }
            Ok(())
        }

        pub fn seed_employee(&self, user_id: Uuid, role: Option<hrms_shared::Role>) -> EmployeeRecord {
            let record = EmployeeRecord {
                id: Uuid::new_v4(),
                user_id,
                email: None,
                first_name: Some("Seed".into()),
                last_name: Some("Employee".into()),
                hire_date: None,
                status: Some("Active".into()),
                role,
                department: None,
                position: None,
            };
            self.employees.borrow_mut().push(record.clone());
            record
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Repository for MockRepository {
        async fn find_employee_by_user(
            &self,
            user_id: Uuid,
        ) -> GatewayResult<Option<EmployeeRecord>> {
            self.enter("find_employee_by_user")?;
            {
                let mut stale = self.stale_lookups.borrow_mut();
                if *stale > 0 {
                    *stale -= 1;
                    return Ok(None);
                }
            }
            Ok(self
                .employees
                .borrow()
                .iter()
                .find(|e| e.user_id == user_id)
                .cloned())
        }

        async fn insert_employee(&self, employee: &NewEmployee) -> GatewayResult<EmployeeRecord> {
            self.enter("insert_employee")?;
            // 模拟 user_id 上的唯一约束
            if self
                .employees
                .borrow()
                .iter()
                .any(|e| e.user_id == employee.user_id)
            {
                return Err(GatewayError::conflict("duplicate key value violates unique constraint")
                    .with_code(hrms_shared::PG_UNIQUE_VIOLATION));
            }
            let record = EmployeeRecord {
                id: Uuid::new_v4(),
                user_id: employee.user_id,
                email: employee.email.clone(),
                first_name: Some(employee.first_name.clone()),
                last_name: Some(employee.last_name.clone()),
                hire_date: Some(employee.hire_date),
                status: Some(employee.status.clone()),
                role: Some(employee.role),
                department: None,
                position: None,
            };
            self.employees.borrow_mut().push(record.clone());
            Ok(record)
        }

        async fn list_employees(&self) -> GatewayResult<Vec<EmployeeSummary>> {
            self.enter("list_employees")?;
            Ok(self
                .employees
                .borrow()
                .iter()
                .map(|e| EmployeeSummary {
                    id: e.id,
                    department: e.department.clone(),
                })
                .collect())
        }

        async fn list_balances(&self, employee_id: EmployeeId) -> GatewayResult<Vec<LeaveBalance>> {
            self.enter("list_balances")?;
            Ok(self
                .balances
                .borrow()
                .iter()
                .filter(|b| b.employee_id == employee_id)
                .cloned()
                .collect())
        }

        async fn find_balance(
            &self,
            employee_id: EmployeeId,
            leave_type: LeaveType,
        ) -> GatewayResult<Option<LeaveBalance>> {
            self.enter("find_balance")?;
            Ok(self
                .balances
                .borrow()
                .iter()
                .find(|b| b.employee_id == employee_id && b.leave_type == leave_type)
                .cloned())
        }

        async fn update_balance(
            &self,
            id: BalanceId,
            update: BalanceUpdate,
        ) -> GatewayResult<LeaveBalance> {
            self.enter("update_balance")?;
            let mut balances = self.balances.borrow_mut();
            let row = balances
                .iter_mut()
                .find(|b| b.id == id)
                .ok_or_else(|| GatewayError::not_found("balance row not found"))?;
            row.taken_days = update.taken_days;
            row.remaining_days = update.remaining_days;
            Ok(row.clone())
        }

        async fn insert_balance(&self, balance: &NewLeaveBalance) -> GatewayResult<LeaveBalance> {
            self.enter("insert_balance")?;
            let row = LeaveBalance {
                id: Uuid::new_v4(),
                employee_id: balance.employee_id,
                leave_type: balance.leave_type,
                accrued_days: balance.accrued_days,
                taken_days: balance.taken_days,
                remaining_days: balance.remaining_days,
            };
            self.balances.borrow_mut().push(row.clone());
            Ok(row)
        }

        async fn list_requests(
            &self,
            employee_id: EmployeeId,
            status: LeaveStatus,
        ) -> GatewayResult<Vec<LeaveRequest>> {
            self.enter("list_requests")?;
            Ok(self
                .requests
                .borrow()
                .iter()
                .filter(|r| r.employee_id == employee_id && r.status == status)
                .cloned()
                .collect())
        }

        async fn list_requests_with_employee(
            &self,
            status: LeaveStatus,
        ) -> GatewayResult<Vec<LeaveRequest>> {
            self.enter("list_requests_with_employee")?;
            let employees = self.employees.borrow();
            Ok(self
                .requests
                .borrow()
                .iter()
                .filter(|r| r.status == status)
                .map(|r| {
                    let mut r = r.clone();
                    r.employees = employees.iter().find(|e| e.id == r.employee_id).map(|e| {
                        hrms_shared::EmployeeName {
                            first_name: e.first_name.clone(),
                            last_name: e.last_name.clone(),
                        }
                    });
                    r
                })
                .collect())
        }

        async fn find_request(&self, id: RequestId) -> GatewayResult<Option<LeaveRequest>> {
            self.enter("find_request")?;
            Ok(self.requests.borrow().iter().find(|r| r.id == id).cloned())
        }

        async fn insert_request(&self, request: &NewLeaveRequest) -> GatewayResult<LeaveRequest> {
            self.enter("insert_request")?;
            let row = LeaveRequest {
                id: Uuid::new_v4(),
                employee_id: request.employee_id,
                leave_type: request.leave_type,
                start_date: request.start_date,
                end_date: request.end_date,
                reason: request.reason.clone(),
                status: request.status,
                employees: None,
            };
            self.requests.borrow_mut().push(row.clone());
            Ok(row)
        }

        async fn transition_request(
            &self,
            id: RequestId,
            from: LeaveStatus,
            to: LeaveStatus,
        ) -> GatewayResult<Option<LeaveRequest>> {
            self.enter("transition_request")?;
            let mut requests = self.requests.borrow_mut();
            Ok(requests
                .iter_mut()
                .find(|r| r.id == id && r.status == from)
                .map(|r| {
                    r.status = to;
                    r.clone()
                }))
        }

        async fn list_offboarding_tasks(&self) -> GatewayResult<Vec<OffboardingTask>> {
            self.enter("list_offboarding_tasks")?;
            Ok(self.offboarding.borrow().clone())
        }
    }

    #[tokio::test]
    async fn test_transition_is_conditional() {
        let repo = MockRepository::new();
        let employee = repo.seed_employee(Uuid::new_v4(), None);
        let created = repo
            .insert_request(&NewLeaveRequest {
                employee_id: employee.id,
                leave_type: LeaveType::Vacation,
                start_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                reason: None,
                status: LeaveStatus::Pending,
            })
            .await
            .unwrap();

        let first = repo
            .transition_request(created.id, LeaveStatus::Pending, LeaveStatus::Approved)
            .await
            .unwrap();
        assert_eq!(first.unwrap().status, LeaveStatus::Approved);

        let second = repo
            .transition_request(created.id, LeaveStatus::Pending, LeaveStatus::Approved)
            .await
            .unwrap();
        assert!(second.is_none());
    }
}
