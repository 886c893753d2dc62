/*
 * Responsibility
 * - Products の request/response DTO
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::product_repo::ProductRow;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.name.len() > 256 {
            return Err("name must be <= 256 chars");
        }
        if let Some(d) = &self.description
            && d.len() > 4096
        {
            return Err("description must be <= 4096 chars");
        }
        if self.price_cents < 0 {
            return Err("price_cents cannot be negative");
        }
        if self.stock < 0 {
            return Err("stock cannot be negative");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i32>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("name cannot be empty");
        }
        if let Some(d) = &self.description
            && d.len() > 4096
        {
            return Err("description must be <= 4096 chars");
        }
        if let Some(price) = self.price_cents
            && price < 0
        {
            return Err("price_cents cannot be negative");
        }
        if let Some(stock) = self.stock
            && stock < 0
        {
            return Err("stock cannot be negative");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
}

impl From<ProductRow> for ProductResponse {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            stock: row.stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_bounds_description_like_create() {
        let long = "x".repeat(4097);

        let create = CreateProductRequest {
            name: "widget".into(),
            description: Some(long.clone()),
            price_cents: 100,
            stock: 1,
        };
        assert!(create.validate().is_err());

        let mut update = UpdateProductRequest {
            name: None,
            description: Some(long),
            price_cents: None,
            stock: None,
        };
        assert!(update.validate().is_err());

        update.description = Some("fits".into());
        assert!(update.validate().is_ok());
    }
}
