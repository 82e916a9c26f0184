//! Product Repository
//!
//! 只读查询 + 商品建档。库存扣减不在这里：必须走订单事务里的
//! 条件扣减语句 (见 `orders::inventory`)，避免读-改-写竞态。

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{Product, ProductCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let product: Option<Product> = self
            .base
            .db()
            .select((PRODUCT_TABLE, record_key(PRODUCT_TABLE, id)))
            .await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.stock_amount < 0 {
            return Err(RepoError::Validation(
                "stock_amount must not be negative".into(),
            ));
        }

        let product = Product {
            id: None,
            name: data.name,
            price: data.price,
            stock_amount: data.stock_amount,
            total_sales: 0,
            sizes: data.sizes,
            colors: data.colors,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }
}
