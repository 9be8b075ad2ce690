//! 日期模块
//!
//! 提供假期日期区间的解析与天数计算：
//! - `parse_date`: 解析表单中的 `YYYY-MM-DD` 字符串
//! - `DateRange`: 闭区间 [start, end]，保证 start <= end

use chrono::NaiveDate;
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 解析 `YYYY-MM-DD`，空串或非法输入返回 None
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// 日期区间校验错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// 起止日期缺失或无法解析
    Missing,
    /// 开始日期晚于结束日期
    Inverted,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::Missing => write!(f, "start and end dates are required"),
            RangeError::Inverted => write!(f, "start date is after end date"),
        }
    }
}

impl std::error::Error for RangeError {}

/// 闭区间 [start, end]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted);
        }
        Ok(Self { start, end })
    }

    /// 从表单字符串构造
    pub fn parse(start: &str, end: &str) -> Result<Self, RangeError> {
        match (parse_date(start), parse_date(end)) {
            (Some(s), Some(e)) => Self::new(s, e),
            _ => Err(RangeError::Missing),
        }
    }

    /// 从已存储的记录构造；若数据本身颠倒则交换端点
    pub fn from_ordered(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// 包含首尾的天数：(end - start) + 1
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}
