pub mod auth;
pub mod health;
pub mod protected;
pub mod session;
