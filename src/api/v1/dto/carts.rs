/*
 * Responsibility
 * - Cart の request/response DTO
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::cart_repo::CartItemRow;

#[derive(Debug, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

impl AddCartItemRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.quantity < 1 {
            return Err("quantity must be at least 1");
        }
        if self.quantity > 99 {
            return Err("quantity must be <= 99");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub product_id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub total_cents: i64,
}

impl CartResponse {
    pub fn from_rows(rows: Vec<CartItemRow>) -> Self {
        let items: Vec<CartItemResponse> = rows
            .into_iter()
            .map(|r| CartItemResponse {
                product_id: r.product_id,
                name: r.name,
                price_cents: r.price_cents,
                quantity: r.quantity,
            })
            .collect();

        let total_cents = items
            .iter()
            .map(|i| i.price_cents * i64::from(i.quantity))
            .sum();

        Self { items, total_cents }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_over_quantities() {
        let cart = CartResponse::from_rows(vec![
            CartItemRow {
                product_id: Uuid::new_v4(),
                name: "a".into(),
                price_cents: 250,
                quantity: 2,
            },
            CartItemRow {
                product_id: Uuid::new_v4(),
                name: "b".into(),
                price_cents: 100,
                quantity: 1,
            },
        ]);
        assert_eq!(cart.total_cents, 600);
    }

    #[test]
    fn quantity_bounds_are_enforced() {
        let mut req = AddCartItemRequest {
            product_id: Uuid::new_v4(),
            quantity: 1,
        };
        assert!(req.validate().is_ok());
        req.quantity = 0;
        assert!(req.validate().is_err());
        req.quantity = 100;
        assert!(req.validate().is_err());
    }
}
