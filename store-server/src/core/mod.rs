//! Core 模块 - 配置、状态、服务器
//!
//! # 内容
//!
//! - [`Config`] - 服务器配置 (环境变量加载)
//! - [`ServerState`] - 服务单例引用集合
//! - [`Server`] - HTTP 服务器启动

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
