use hrms_shared::protocol::Identity;
use hrms_shared::{EmployeeRecord, Role};

/// 当前会话
///
/// 不可变值：每次认证状态变化都整体替换，只由 `AuthController` 产生。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    /// 首次认证解析完成之前
    #[default]
    Loading,
    Anonymous,
    Authenticated {
        identity: Identity,
        role: Role,
        /// 角色查询失败时为空
        employee: Option<EmployeeRecord>,
    },
}

impl Session {
    pub fn is_loading(&self) -> bool {
        matches!(self, Session::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Session::Authenticated { role, .. } => Some(*role),
            _ => None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated { identity, .. } => Some(identity),
            _ => None,
        }
    }

    pub fn employee(&self) -> Option<&EmployeeRecord> {
        match self {
            Session::Authenticated { employee, .. } => employee.as_ref(),
            _ => None,
        }
    }

    /// 页头显示：员工姓名，否则邮箱
    pub fn display_name(&self) -> String {
        match self {
            Session::Authenticated {
                identity, employee, ..
            } => employee
                .as_ref()
                .map(EmployeeRecord::full_name)
                .filter(|name| !name.is_empty())
                .or_else(|| identity.email.clone())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}
