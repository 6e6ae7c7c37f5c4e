//! API models

pub mod catgenie;
pub mod lenient;
pub mod switchbot;
