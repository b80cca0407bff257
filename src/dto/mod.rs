pub mod auth;
pub mod cart;
pub mod products;
pub mod profile;
pub mod purchases;
