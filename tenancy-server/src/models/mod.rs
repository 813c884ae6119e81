//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod tenant;
pub mod user;
pub mod todo;

pub use validation::ValidationError;
pub use tenant::{TenantId, TenantName};
pub use user::{Email, Username};
pub use todo::{TodoDescription, TodoTitle};
