//! 订单工作流引擎
//!
//! 把购物车变成持久订单的全部路径都在这里：
//!
//! - [`cart`]: 购物车聚合器 - 合并重复的商品+变体行
//! - [`inventory`]: 库存账本 - 可用性检查 + 事务内条件扣减
//! - [`workflow`]: 结算工作流 (`place_order`)
//! - [`invoice`]: 发票生成器 (幂等、状态门控)
//! - [`import`]: 手工订单导入 (历史/线下销售)
//! - [`status`]: 管理端状态机更新
//!
//! 所有多步写操作都是单个全有或全无的数据库事务，超时即中止并向
//! 调用方返回可重试错误。通知/渲染副作用一律在事务提交后派发。

pub mod cart;
pub mod error;
pub mod import;
pub mod inventory;
pub mod invoice;
pub mod status;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use cart::{MergedLine, merge_cart_lines};
pub use error::OrderError;
pub use import::{ImportService, ManualOrder, ManualOrderLine, UserHandle};
pub use invoice::{InvoiceOutcome, InvoiceService};
pub use status::OrderAdminService;
pub use workflow::{CheckoutService, PlaceOrder};
