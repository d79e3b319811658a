//! Business logic services.
//!
//! Services contain the data-access logic separated from HTTP handlers.
//! They receive already-validated values and issue parameterized SQL.

/// API key issuance and validation
pub mod api_key_service;
/// Category CRUD
pub mod category_service;
/// Transaction CRUD and filtered listing
pub mod transaction_service;
