//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑，不依赖 DOM。定义应用的所有路由以及各自要求的角色。

use hrms_shared::Role;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// `/`：匿名用户看到登录页，已登录用户按角色落地
    #[default]
    Landing,
    EmployeeDashboard,
    HrAdminDashboard,
    Unauthorized,
}

const EMPLOYEE_DASHBOARD_ROLES: &[Role] = &[Role::Employee, Role::HrAdmin];
const HR_ADMIN_DASHBOARD_ROLES: &[Role] = &[Role::HrAdmin];

impl AppRoute {
    /// 将 URL path 解析为路由；未匹配的路径回到 `/`
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" => Self::Landing,
            "/employee-dashboard" => Self::EmployeeDashboard,
            "/hr-admin-dashboard" => Self::HrAdminDashboard,
            "/unauthorized" => Self::Unauthorized,
            _ => Self::Landing,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::EmployeeDashboard => "/employee-dashboard",
            Self::HrAdminDashboard => "/hr-admin-dashboard",
            Self::Unauthorized => "/unauthorized",
        }
    }

    /// 受保护路由允许的角色；`None` 表示公开
    pub fn required_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::EmployeeDashboard => Some(EMPLOYEE_DASHBOARD_ROLES),
            Self::HrAdminDashboard => Some(HR_ADMIN_DASHBOARD_ROLES),
            Self::Landing | Self::Unauthorized => None,
        }
    }

    /// 已登录用户访问 `/` 时的落地页
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::HrAdmin => Self::HrAdminDashboard,
            Role::Employee => Self::EmployeeDashboard,
            Role::Unknown => Self::Unauthorized,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Landing => "Sign In",
            Self::EmployeeDashboard => "Employee Dashboard",
            Self::HrAdminDashboard => "HR Admin Dashboard",
            Self::Unauthorized => "Unauthorized",
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
