use chrono::{NaiveDate, Utc};

/// 时间来源抽象（入职日期、令牌过期判断）
pub trait Clock {
    fn today(&self) -> NaiveDate;
    fn now_unix(&self) -> i64;
}

/// 生产环境：系统时间（wasm32 下经由 js Date）
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// 固定时间，用于测试
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub now_unix: i64,
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_unix(&self) -> i64 {
        self.now_unix
    }
}
