//! Entity models
//!
//! Shapes the cloudlink agent hands to its host: entity states, device info
//! and the request/response bodies of the local host API.

pub mod models;
