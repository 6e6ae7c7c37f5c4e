//! Domain models

pub mod device;
pub mod status;
pub mod vacuum;
