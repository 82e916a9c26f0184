//! User Model
//!
//! 最小用户行：仅支撑订单归属与手工导入的 create-if-absent。
//! 资料管理是外部协作者的职责。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Unique (enforced by index `user_email`)
    pub email: String,
    pub name: String,
    pub created_at: Option<String>,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub name: String,
}
