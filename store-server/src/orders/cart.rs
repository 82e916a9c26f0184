//! Cart Aggregator
//!
//! 同一商品+变体可能分散在多行 cart_item 里（独立的加购调用各建一行）。
//! 任何库存检查/扣减之前必须先按 (product, size, color) 合并数量：
//! 对未合并的行逐行校验会低估需求量。

use crate::db::models::CartItem;
use std::collections::HashMap;

/// Distinct product+variant key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct VariantKey {
    product_id: String,
    size: Option<String>,
    color: Option<String>,
}

/// One deduplicated checkout line
#[derive(Debug, Clone, PartialEq)]
pub struct MergedLine {
    /// Product record key (no table prefix)
    pub product_id: String,
    /// Summed quantity across all cart rows of this variant
    pub quantity: i64,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
}

/// Collapse raw cart lines into unique product+variant quantities
///
/// First-appearance order is preserved so checkout output is stable.
pub fn merge_cart_lines(items: &[CartItem]) -> Vec<MergedLine> {
    let mut index: HashMap<VariantKey, usize> = HashMap::new();
    let mut merged: Vec<MergedLine> = Vec::new();

    for item in items {
        let product_id = item.product.key().to_string();
        let key = VariantKey {
            product_id: product_id.clone(),
            size: item.selected_size.clone(),
            color: item.selected_color.clone(),
        };

        match index.get(&key) {
            Some(&slot) => merged[slot].quantity += item.quantity,
            None => {
                index.insert(key, merged.len());
                merged.push(MergedLine {
                    product_id,
                    quantity: item.quantity,
                    selected_size: item.selected_size.clone(),
                    selected_color: item.selected_color.clone(),
                });
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn line(product: &str, qty: i64, size: Option<&str>, color: Option<&str>) -> CartItem {
        CartItem {
            id: None,
            cart: RecordId::from_table_key("cart", "c1"),
            product: RecordId::from_table_key("product", product),
            quantity: qty,
            selected_size: size.map(str::to_string),
            selected_color: color.map(str::to_string),
        }
    }

    #[test]
    fn duplicate_variants_are_summed() {
        let merged = merge_cart_lines(&[
            line("p1", 2, Some("M"), None),
            line("p1", 3, Some("M"), None),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, 5);
        assert_eq!(merged[0].product_id, "p1");
    }

    #[test]
    fn different_variants_stay_separate() {
        let merged = merge_cart_lines(&[
            line("p1", 1, Some("M"), None),
            line("p1", 1, Some("L"), None),
            line("p1", 1, Some("M"), Some("red")),
        ]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn first_appearance_order_is_preserved() {
        let merged = merge_cart_lines(&[
            line("p2", 1, None, None),
            line("p1", 1, None, None),
            line("p2", 4, None, None),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].product_id, "p2");
        assert_eq!(merged[0].quantity, 5);
        assert_eq!(merged[1].product_id, "p1");
    }

    #[test]
    fn empty_cart_merges_to_nothing() {
        assert!(merge_cart_lines(&[]).is_empty());
    }
}
