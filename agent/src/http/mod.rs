//! Vendor HTTP clients

pub mod client;
pub mod devices;
pub mod switchbot;
