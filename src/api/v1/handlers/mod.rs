pub mod carts;
pub mod health;
pub mod products;
pub mod reviews;
pub mod users;
