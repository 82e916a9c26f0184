use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::notify::{LogNotifier, LogRenderer, NotifyService};
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是店铺后端的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | notify | NotifyService | 通知与单据渲染边界 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 通知服务 (邮件 sink + 单据渲染，fire-and-forget)
    pub notify: NotifyService,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(config: Config, db: Surreal<Db>, notify: NotifyService) -> Self {
        Self { config, db, notify }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/store.db, RocksDB)
    /// 3. 通知服务 (默认 log 实现，生产替换为 SMTP/PDF 适配器)
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = db_dir.join("store.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let notify = NotifyService::new(
            Arc::new(LogNotifier),
            Arc::new(LogRenderer),
            config.operator_email.clone(),
        );

        Ok(Self::new(config.clone(), db_service.db, notify))
    }

    /// 初始化内存数据库状态 (测试用)
    pub async fn initialize_in_memory(config: &Config) -> Result<Self, AppError> {
        let db_service = DbService::new_in_memory().await?;
        let notify = NotifyService::new(
            Arc::new(LogNotifier),
            Arc::new(LogRenderer),
            config.operator_email.clone(),
        );
        Ok(Self::new(config.clone(), db_service.db, notify))
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
