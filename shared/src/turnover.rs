//! 员工流失率（简化口径：离职任务数 / 员工总数）

use serde::{Deserialize, Serialize};

pub const LABEL_TOTAL: &str = "Total Employees";
pub const LABEL_OFFBOARDED: &str = "Offboarded";
pub const LABEL_RATE: &str = "Turnover Rate (%)";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TurnoverSummary {
    pub total_employees: usize,
    pub offboarded: usize,
    /// 百分比，保留两位小数
    pub rate_percent: f64,
}

impl TurnoverSummary {
    pub fn compute(total_employees: usize, offboarded: usize) -> Self {
        let rate_percent = if total_employees > 0 {
            round2(offboarded as f64 / total_employees as f64 * 100.0)
        } else {
            0.0
        };
        Self {
            total_employees,
            offboarded,
            rate_percent,
        }
    }

    /// 图表数据点：(标签, 数值)
    pub fn chart_points(&self) -> [(&'static str, f64); 3] {
        [
            (LABEL_TOTAL, self.total_employees as f64),
            (LABEL_OFFBOARDED, self.offboarded as f64),
            (LABEL_RATE, self.rate_percent),
        ]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
