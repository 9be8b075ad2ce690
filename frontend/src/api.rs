//! 网关装配
//!
//! 配置在编译期通过环境变量注入（trunk build 时设置
//! `SUPABASE_URL` / `SUPABASE_ANON_KEY`）。缺失时记录错误，应用照常启动。

use crate::web::{FetchClient, PersistedSession};
use hrms::{AuthController, GatewayConfig, SupabaseApi};
use hrms::clock::SystemClock;
use hrms::config::{ENV_ANON_KEY, ENV_URL};
use std::rc::Rc;

pub type Gateway = SupabaseApi<FetchClient>;
pub type Controller = AuthController<Gateway, Gateway>;

fn compile_time_config() -> GatewayConfig {
    GatewayConfig::from_lookup(|name| {
        let value = match name {
            ENV_URL => option_env!("SUPABASE_URL"),
            ENV_ANON_KEY => option_env!("SUPABASE_ANON_KEY"),
            _ => None,
        };
        value.map(str::to_string)
    })
}

pub fn build_gateway() -> Rc<Gateway> {
    Rc::new(
        SupabaseApi::new(FetchClient, compile_time_config()).with_persistence(PersistedSession),
    )
}

pub fn build_controller(gateway: &Rc<Gateway>) -> Controller {
    AuthController::new(gateway.clone(), gateway.clone(), Rc::new(SystemClock))
}
