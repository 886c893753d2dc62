/*
 * Responsibility
 * - Users の request/response DTO
 * - validation (形式チェック) 用の validate() を持たせる
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::auth::{AuthUser, Role};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.name.len() > 128 {
            return Err("name must be <= 128 chars");
        }
        if !self.email.contains('@') || self.email.len() > 254 {
            return Err("a valid email is required");
        }
        if self.password.len() < 8 {
            return Err("password must be at least 8 chars");
        }
        if self.password.len() > 128 {
            return Err("password must be <= 128 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() {
            return Err("email is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
}

impl UpdateMeRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("name cannot be empty");
            }
            if name.len() > 128 {
                return Err("name must be <= 128 chars");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<AuthUser> for UserResponse {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_rejects_short_password_and_bad_email() {
        let mut req = SignupRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "longenough".into(),
        };
        assert!(req.validate().is_ok());

        req.password = "short".into();
        assert!(req.validate().is_err());

        req.password = "longenough".into();
        req.email = "no-at-sign".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_rejects_blank_name_but_allows_absent() {
        assert!(UpdateMeRequest { name: None }.validate().is_ok());
        assert!(
            UpdateMeRequest {
                name: Some("  ".into())
            }
            .validate()
            .is_err()
        );
    }
}
