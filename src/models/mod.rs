//! Data models representing database entities and the request types that create and modify them.
//!
//! Every request type has a `validate()` method producing a typed value for the service layer;
//! nothing reaches the database without passing through one.

/// API key authentication model
pub mod api_key;
/// Income/expense categories
pub mod category;
/// Page/limit normalization
pub mod pagination;
/// Financial transactions
pub mod transaction;
/// Field checks shared by the request types
pub mod validation;
