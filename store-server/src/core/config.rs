use rust_decimal::Decimal;
use std::path::PathBuf;

/// 服务器配置 - 店铺后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/coral/store | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | DEFAULT_DELIVERY_FEE | 100 | 配送费兜底值 (无费率表命中时) |
/// | TXN_TIMEOUT_MS | 10000 | 订单事务超时(毫秒) |
/// | MAX_CONNECTIONS | 1000 | 最大并发请求数 |
/// | OPERATOR_EMAIL | operator@store.local | 店铺运营通知收件人 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/coral HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 配送费兜底值：费率表 (country, city) 与 (country, NONE) 均未命中时使用
    pub default_delivery_fee: Decimal,
    /// 订单事务超时 (毫秒)；超时视为可重试的并发冲突
    pub txn_timeout_ms: u64,
    /// 最大并发请求数
    pub max_connections: usize,
    /// 店铺运营通知收件人 (下单确认抄送)
    pub operator_email: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/coral/store".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            default_delivery_fee: std::env::var("DEFAULT_DELIVERY_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| Decimal::new(100, 0)),
            txn_timeout_ms: std::env::var("TXN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),
            max_connections: std::env::var("MAX_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1000),
            operator_email: std::env::var("OPERATOR_EMAIL")
                .unwrap_or_else(|_| "operator@store.local".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
