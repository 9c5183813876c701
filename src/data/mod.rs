//! Data module - CSV loading, schema and validation

mod loader;
pub mod schema;
mod validator;

pub use loader::{DataLoader, LoaderError};
pub use validator::{DataValidator, ValidationError};
