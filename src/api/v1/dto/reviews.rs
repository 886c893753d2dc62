/*
 * Responsibility
 * - Reviews の request/response DTO
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::review_repo::ReviewRow;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i16,
    pub comment: Option<String>,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(1..=5).contains(&self.rating) {
            return Err("rating must be between 1 and 5");
        }
        if let Some(c) = &self.comment
            && c.len() > 2000
        {
            return Err("comment must be <= 2000 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
}

impl From<ReviewRow> for ReviewResponse {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            rating: row.rating,
            comment: row.comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_must_be_one_through_five() {
        for rating in 1..=5 {
            let req = CreateReviewRequest {
                rating,
                comment: None,
            };
            assert!(req.validate().is_ok());
        }
        for rating in [0, 6, -1] {
            let req = CreateReviewRequest {
                rating,
                comment: None,
            };
            assert!(req.validate().is_err());
        }
    }
}
