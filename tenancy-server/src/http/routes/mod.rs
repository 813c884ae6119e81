//! Route handlers organized by resource

pub mod health;
pub mod tenants;
pub mod users;
pub mod todos;
