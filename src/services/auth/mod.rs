pub mod cookie;
pub mod jwt;
pub mod lookup;
pub mod password;

pub use jwt::SessionJwt;
pub use lookup::{AuthUser, PgUserLookup, Role, UserLookup};
