use super::{RestQuery, SupabaseApi};
use crate::error::{GatewayError, GatewayResult};
use crate::repository::Repository;
use crate::request::HttpClient;
use hrms_shared::{
    BalanceId, BalanceUpdate, EmployeeId, EmployeeRecord, EmployeeSummary, LeaveBalance,
    LeaveRequest, LeaveStatus, LeaveType, NewEmployee, NewLeaveBalance, NewLeaveRequest,
    OffboardingTask, RequestId, StatusPatch, TABLE_EMPLOYEES, TABLE_LEAVE_BALANCES,
    TABLE_LEAVE_REQUESTS, TABLE_OFFBOARDING_TASKS,
};
use uuid::Uuid;

const REQUEST_WITH_EMPLOYEE: &str = "*,employees(firstName,lastName)";

#[async_trait::async_trait(?Send)]
impl<C: HttpClient> Repository for SupabaseApi<C> {
    async fn find_employee_by_user(&self, user_id: Uuid) -> GatewayResult<Option<EmployeeRecord>> {
        self.select_single(
            RestQuery::table(TABLE_EMPLOYEES)
                .select("*")
                .eq("user_id", user_id),
        )
        .await
    }

    async fn insert_employee(&self, employee: &NewEmployee) -> GatewayResult<EmployeeRecord> {
        self.insert_one(TABLE_EMPLOYEES, employee).await
    }

    async fn list_employees(&self) -> GatewayResult<Vec<EmployeeSummary>> {
        self.select_many(RestQuery::table(TABLE_EMPLOYEES).select("id,department"))
            .await
    }

    async fn list_balances(&self, employee_id: EmployeeId) -> GatewayResult<Vec<LeaveBalance>> {
        self.select_many(
            RestQuery::table(TABLE_LEAVE_BALANCES)
                .select("*")
                .eq("employeeId", employee_id),
        )
        .await
    }

    async fn find_balance(
        &self,
        employee_id: EmployeeId,
        leave_type: LeaveType,
    ) -> GatewayResult<Option<LeaveBalance>> {
        self.select_single(
            RestQuery::table(TABLE_LEAVE_BALANCES)
                .select("*")
                .eq("employeeId", employee_id)
                .eq("leaveType", leave_type.as_str()),
        )
        .await
    }

    async fn update_balance(
        &self,
        id: BalanceId,
        update: BalanceUpdate,
    ) -> GatewayResult<LeaveBalance> {
        let rows: Vec<LeaveBalance> = self
            .update_many(RestQuery::table(TABLE_LEAVE_BALANCES).eq("id", id), &update)
            .await?;
        rows.into_iter().next().ok_or_else(|| {
            GatewayError::not_found("Leave balance not found.")
                .in_op_with("rest.update", TABLE_LEAVE_BALANCES)
        })
    }

    async fn insert_balance(&self, balance: &NewLeaveBalance) -> GatewayResult<LeaveBalance> {
        self.insert_one(TABLE_LEAVE_BALANCES, balance).await
    }

    async fn list_requests(
        &self,
        employee_id: EmployeeId,
        status: LeaveStatus,
    ) -> GatewayResult<Vec<LeaveRequest>> {
        self.select_many(
            RestQuery::table(TABLE_LEAVE_REQUESTS)
                .select("*")
                .eq("employeeId", employee_id)
                .eq("status", status.as_str()),
        )
        .await
    }

    async fn list_requests_with_employee(
        &self,
        status: LeaveStatus,
    ) -> GatewayResult<Vec<LeaveRequest>> {
        self.select_many(
            RestQuery::table(TABLE_LEAVE_REQUESTS)
                .select(REQUEST_WITH_EMPLOYEE)
                .eq("status", status.as_str()),
        )
        .await
    }

    async fn find_request(&self, id: RequestId) -> GatewayResult<Option<LeaveRequest>> {
        self.select_single(RestQuery::table(TABLE_LEAVE_REQUESTS).select("*").eq("id", id))
            .await
    }

    async fn insert_request(&self, request: &NewLeaveRequest) -> GatewayResult<LeaveRequest> {
        self.insert_one(TABLE_LEAVE_REQUESTS, request).await
    }

    async fn transition_request(
        &self,
        id: RequestId,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> GatewayResult<Option<LeaveRequest>> {
        let rows: Vec<LeaveRequest> = self
            .update_many(
                RestQuery::table(TABLE_LEAVE_REQUESTS)
                    .eq("id", id)
                    .eq("status", from.as_str()),
                &StatusPatch { status: to },
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_offboarding_tasks(&self) -> GatewayResult<Vec<OffboardingTask>> {
        self.select_many(RestQuery::table(TABLE_OFFBOARDING_TASKS).select("employeeId"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::test_api;
    use crate::error::ErrorKind;
    use crate::request::HttpMethod;
    use serde_json::json;

    #[tokio::test]
    async fn test_find_employee_by_user() {
        let api = test_api();
        let user_id = Uuid::new_v4();
        let employee_id = Uuid::new_v4();
        let url = format!(
            "https://xyz.supabase.co/rest/v1/employees?select=*&user_id=eq.{}",
            user_id
        );
        api.client.mock_response(
            HttpMethod::Get,
            &url,
            200,
            json!({
                "id": employee_id,
                "user_id": user_id,
                "firstName": "Jane",
                "lastName": "Doe",
                "role": "hr_admin"
            }),
        );

        let record = api.find_employee_by_user(user_id).await.unwrap().unwrap();
        assert_eq!(record.id, employee_id);
        assert_eq!(record.effective_role(), hrms_shared::Role::HrAdmin);
    }

    #[tokio::test]
    async fn test_insert_employee_conflict_keeps_code() {
        let api = test_api();
        api.client.mock_response(
            HttpMethod::Post,
            "https://xyz.supabase.co/rest/v1/employees",
            409,
            json!({ "code": "23505", "message": "duplicate key value violates unique constraint" }),
        );
        let new = NewEmployee::provision(
            Uuid::new_v4(),
            Some("a@b.c"),
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        );

        let err = api.insert_employee(&new).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.code(), Some(hrms_shared::PG_UNIQUE_VIOLATION));

        let sent = api.client.last_request().unwrap();
        assert_eq!(sent.header("Prefer"), Some("return=representation"));
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["role"], "employee");
        assert_eq!(body["hireDate"], "2024-05-01");
    }

    #[tokio::test]
    async fn test_transition_is_conditional_on_status() {
        let api = test_api();
        let id = Uuid::new_v4();
        let url = format!(
            "https://xyz.supabase.co/rest/v1/leaveRequests?id=eq.{}&status=eq.pending",
            id
        );
        // 已被处理：没有匹配行
        api.client.mock_response(HttpMethod::Patch, &url, 200, json!([]));

        let updated = api
            .transition_request(id, LeaveStatus::Pending, LeaveStatus::Approved)
            .await
            .unwrap();
        assert!(updated.is_none());

        let sent = api.client.last_request().unwrap();
        assert_eq!(sent.body.as_deref(), Some(r#"{"status":"approved"}"#));
    }

    #[tokio::test]
    async fn test_pending_list_embeds_employee_names() {
        let api = test_api();
        api.client.mock_response(
            HttpMethod::Get,
            "https://xyz.supabase.co/rest/v1/leaveRequests?select=*%2Cemployees%28firstName%2ClastName%29&status=eq.pending",
            200,
            json!([{
                "id": Uuid::new_v4(),
                "employeeId": Uuid::new_v4(),
                "leaveType": "vacation",
                "startDate": "2024-01-01",
                "endDate": "2024-01-03",
                "reason": "trip",
                "status": "pending",
                "employees": { "firstName": "Jane", "lastName": "Doe" }
            }]),
        );

        let pending = api
            .list_requests_with_employee(LeaveStatus::Pending)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].employee_name(), "Jane Doe");
    }
}
