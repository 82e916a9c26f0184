//! Coral Store Server - 电商订单与履约后端
//!
//! # 架构概述
//!
//! 本模块是 Store Server 的主入口，提供以下核心功能：
//!
//! - **订单工作流** (`orders`): 购物车结算、库存账本、状态机、发票生成
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **通知** (`notify`): 邮件/单据渲染外部协作者的 trait 边界
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、服务器启动
//! ├── auth/          # 网关注入的当前用户身份
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误、日志、校验
//! ├── db/            # 数据库层 (models + repositories)
//! ├── notify/        # 通知与单据渲染边界
//! └── orders/        # 订单工作流引擎
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::CurrentUser;
pub use core::{Config, Server, ServerState};
pub use orders::{CheckoutService, ImportService, InvoiceOutcome, InvoiceService, OrderError};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______                __
  / ____/___  _________ _/ /
 / /   / __ \/ ___/ __ `/ /
/ /___/ /_/ / /  / /_/ / /
\____/\____/_/   \__,_/_/
   _____ __
  / ___// /_____  ________
  \__ \/ __/ __ \/ ___/ _ \
 ___/ / /_/ /_/ / /  /  __/
/____/\__/\____/_/   \___/
    "#
    );
}
