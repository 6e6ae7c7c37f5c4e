//! cloudlink library
//!
//! Polls the CatGenie and SwitchBot clouds and exposes litter box and robot
//! vacuum state to a local host.

pub mod app;
pub mod authn;
pub mod coordinator;
pub mod entities;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod server;
pub mod storage;
pub mod utils;
pub mod vacuum;
pub mod workers;
