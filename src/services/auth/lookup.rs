use std::{future::Future, pin::Pin, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::repos::user_repo;

/// Coarse-grained account role. Stored as text in the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// The resolved identity the auth middleware attaches to a request.
///
/// Owned by user management; this core only reads it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("db error")]
    Db(#[from] RepoError),

    #[error("corrupt user record: {0}")]
    Corrupt(&'static str),
}

/// User-lookup collaborator consumed by the auth middleware.
///
/// Returns:
/// - `Ok(Some(_))` => account exists
/// - `Ok(None)`    => account no longer exists (caller decides the policy)
/// - `Err(_)`      => backend failure (caller must treat as fail-closed)
pub trait UserLookup: Send + Sync {
    fn find_by_id<'a>(
        &'a self,
        user_id: Uuid,
    ) -> Pin<Box<dyn Future<Output = Result<Option<AuthUser>, LookupError>> + Send + 'a>>;
}

/// Postgres-backed lookup used by the running service.
#[derive(Clone)]
pub struct PgUserLookup {
    db: PgPool,
}

impl PgUserLookup {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl UserLookup for PgUserLookup {
    fn find_by_id<'a>(
        &'a self,
        user_id: Uuid,
    ) -> Pin<Box<dyn Future<Output = Result<Option<AuthUser>, LookupError>> + Send + 'a>> {
        Box::pin(async move {
            let row = match user_repo::get(&self.db, user_id).await? {
                Some(row) => row,
                None => return Ok(None),
            };

            let role =
                Role::from_str(&row.role).map_err(|_| LookupError::Corrupt("role"))?;

            Ok(Some(AuthUser {
                id: row.id,
                email: row.email,
                name: row.name,
                role,
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(Role::from_str("admin"), Ok(Role::Admin));
        assert_eq!(Role::from_str("customer"), Ok(Role::Customer));
        assert_eq!(Role::Admin.as_str(), "admin");
        assert!(Role::from_str("superuser").is_err());
    }
}
