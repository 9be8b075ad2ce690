use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod date;
pub mod protocol;
pub mod turnover;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const TABLE_EMPLOYEES: &str = "employees";
pub const TABLE_LEAVE_BALANCES: &str = "leaveBalances";
pub const TABLE_LEAVE_REQUESTS: &str = "leaveRequests";
pub const TABLE_OFFBOARDING_TASKS: &str = "offboardingTasks";

/// PostgREST: 请求单行但结果为 0 行（或多行）
pub const PGRST_NO_ROWS: &str = "PGRST116";
/// Postgres: unique_violation
pub const PG_UNIQUE_VIOLATION: &str = "23505";

pub const DEFAULT_EMPLOYEE_STATUS: &str = "Active";

pub type EmployeeId = Uuid;
pub type RequestId = Uuid;
pub type BalanceId = Uuid;

// =========================================================
// 角色 (Role)
// =========================================================

/// 会话的授权级别
///
/// 封闭枚举：数据库中无法识别的字符串统一落到 `Unknown`，
/// `Unknown` 不被任何受保护路由接受。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    #[default]
    Employee,
    HrAdmin,
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::HrAdmin => "hr_admin",
            Role::Unknown => "unknown",
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s.trim() {
            // 空字符串与 null 同样视为默认角色
            "" | "employee" => Role::Employee,
            "hr_admin" => Role::HrAdmin,
            _ => Role::Unknown,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::from(s.as_str())
    }
}

impl From<Role> for String {
    fn from(r: Role) -> Self {
        r.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// 假期类型与状态
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    #[default]
    Vacation,
    Sick,
    Maternity,
    Paternity,
}

impl LeaveType {
    pub const ALL: [LeaveType; 4] = [
        LeaveType::Vacation,
        LeaveType::Sick,
        LeaveType::Maternity,
        LeaveType::Paternity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Vacation => "vacation",
            LeaveType::Sick => "sick",
            LeaveType::Maternity => "maternity",
            LeaveType::Paternity => "paternity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeaveType::Vacation => "Vacation",
            LeaveType::Sick => "Sick",
            LeaveType::Maternity => "Maternity",
            LeaveType::Paternity => "Paternity",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// `employees` 表的一行，同时承载会话角色
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub user_id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(rename = "hireDate", default)]
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    /// 为空时按 `employee` 处理
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

impl EmployeeRecord {
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or_default()
    }

    pub fn full_name(&self) -> String {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

/// 首次登录时自动创建的员工记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub user_id: Uuid,
    pub email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "hireDate")]
    pub hire_date: NaiveDate,
    pub status: String,
    pub role: Role,
}

impl NewEmployee {
    /// 为新身份构造默认记录：姓名取自邮箱本地部分，角色为 `employee`
    pub fn provision(user_id: Uuid, email: Option<&str>, hire_date: NaiveDate) -> Self {
        let (first_name, last_name) = display_name_from_email(email.unwrap_or_default());
        Self {
            user_id,
            email: email.map(str::to_string),
            first_name,
            last_name,
            hire_date,
            status: DEFAULT_EMPLOYEE_STATUS.to_string(),
            role: Role::Employee,
        }
    }
}

/// 从邮箱推导显示名称：`jane.doe@x.io` -> ("Jane", "Doe")
///
/// 缺失部分分别回退为 "New" / "User"。
pub fn display_name_from_email(email: &str) -> (String, String) {
    let local = email.split('@').next().unwrap_or_default();
    let mut parts = local.split('.');
    let first = parts.next().map(capitalize).filter(|s| !s.is_empty());
    let last = parts.next().map(capitalize).filter(|s| !s.is_empty());
    (
        first.unwrap_or_else(|| "New".to_string()),
        last.unwrap_or_else(|| "User".to_string()),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn join_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 员工计数用的精简行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub id: EmployeeId,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub id: BalanceId,
    #[serde(rename = "employeeId")]
    pub employee_id: EmployeeId,
    #[serde(rename = "leaveType")]
    pub leave_type: LeaveType,
    #[serde(rename = "accruedDays")]
    pub accrued_days: i64,
    #[serde(rename = "takenDays")]
    pub taken_days: i64,
    #[serde(rename = "remainingDays")]
    pub remaining_days: i64,
}

impl LeaveBalance {
    /// 批准后应写回的 (taken, remaining)：remaining 始终由 accrued 重新计算
    pub fn after_taking(&self, days: i64) -> BalanceUpdate {
        let taken_days = self.taken_days + days;
        BalanceUpdate {
            taken_days,
            remaining_days: self.accrued_days - taken_days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceUpdate {
    #[serde(rename = "takenDays")]
    pub taken_days: i64,
    #[serde(rename = "remainingDays")]
    pub remaining_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLeaveBalance {
    #[serde(rename = "employeeId")]
    pub employee_id: EmployeeId,
    #[serde(rename = "leaveType")]
    pub leave_type: LeaveType,
    #[serde(rename = "accruedDays")]
    pub accrued_days: i64,
    #[serde(rename = "takenDays")]
    pub taken_days: i64,
    #[serde(rename = "remainingDays")]
    pub remaining_days: i64,
}

impl NewLeaveBalance {
    /// 无累计额度时首次批准所建立的余额行
    pub fn opened_by(employee_id: EmployeeId, leave_type: LeaveType, days: i64) -> Self {
        Self {
            employee_id,
            leave_type,
            accrued_days: 0,
            taken_days: days,
            remaining_days: -days,
        }
    }
}

/// HR 列表中嵌入的 `employees(firstName, lastName)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeName {
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
}

impl EmployeeName {
    pub fn full_name(&self) -> String {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: RequestId,
    #[serde(rename = "employeeId")]
    pub employee_id: EmployeeId,
    #[serde(rename = "leaveType")]
    pub leave_type: LeaveType,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: LeaveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<EmployeeName>,
}

impl LeaveRequest {
    pub fn range(&self) -> date::DateRange {
        date::DateRange::from_ordered(self.start_date, self.end_date)
    }

    pub fn employee_name(&self) -> String {
        self.employees
            .as_ref()
            .map(EmployeeName::full_name)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLeaveRequest {
    #[serde(rename = "employeeId")]
    pub employee_id: EmployeeId,
    #[serde(rename = "leaveType")]
    pub leave_type: LeaveType,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: LeaveStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffboardingTask {
    #[serde(rename = "employeeId")]
    pub employee_id: EmployeeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPatch {
    pub status: LeaveStatus,
}

// =========================================================
// 单元测试
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_parsing_is_closed() {
        assert_eq!(Role::from("employee"), Role::Employee);
        assert_eq!(Role::from("hr_admin"), Role::HrAdmin);
        // 旧代码里出现过的 camelCase 写法不被接受
        assert_eq!(Role::from("hrAdmin"), Role::Unknown);
        assert_eq!(Role::from(""), Role::Employee);
        assert_eq!(Role::from("  "), Role::Employee);

        let role: Role = serde_json::from_value(json!("hr_admin")).unwrap();
        assert_eq!(role, Role::HrAdmin);
        assert_eq!(serde_json::to_value(Role::HrAdmin).unwrap(), json!("hr_admin"));
    }

    #[test]
    fn test_display_name_from_email() {
        assert_eq!(
            display_name_from_email("jane.doe@corp.io"),
            ("Jane".to_string(), "Doe".to_string())
        );
        assert_eq!(
            display_name_from_email("bob@corp.io"),
            ("Bob".to_string(), "User".to_string())
        );
        assert_eq!(
            display_name_from_email(""),
            ("New".to_string(), "User".to_string())
        );
    }

    #[test]
    fn test_employee_record_null_role_defaults_to_employee() {
        let record: EmployeeRecord = serde_json::from_value(json!({
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "user_id": "16fd2706-8baf-433b-82eb-8c7fada847da",
            "firstName": "Jane",
            "lastName": "Doe",
            "role": null
        }))
        .unwrap();
        assert_eq!(record.effective_role(), Role::Employee);
        assert_eq!(record.full_name(), "Jane Doe");
    }

    #[test]
    fn test_balance_recomputes_remaining_from_accrued() {
        let balance = LeaveBalance {
            id: Uuid::nil(),
            employee_id: Uuid::nil(),
            leave_type: LeaveType::Vacation,
            accrued_days: 20,
            taken_days: 5,
            // 与 accrued - taken 不一致的脏数据
            remaining_days: 99,
        };
        let update = balance.after_taking(3);
        assert_eq!(update.taken_days, 8);
        assert_eq!(update.remaining_days, 12);
    }

    #[test]
    fn test_leave_request_wire_format() {
        let req: LeaveRequest = serde_json::from_value(json!({
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "employeeId": "16fd2706-8baf-433b-82eb-8c7fada847da",
            "leaveType": "sick",
            "startDate": "2024-01-01",
            "endDate": "2024-01-03",
            "reason": null,
            "status": "pending",
            "employees": { "firstName": "Jane", "lastName": "Doe" }
        }))
        .unwrap();
        assert_eq!(req.leave_type, LeaveType::Sick);
        assert_eq!(req.status, LeaveStatus::Pending);
        assert_eq!(req.employee_name(), "Jane Doe");
        assert_eq!(req.range().day_count(), 3);
    }
}
