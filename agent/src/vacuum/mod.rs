pub mod entity;
pub mod state;

pub use entity::VacuumEntity;
pub use state::{FanSpeed, VacuumFeature, VacuumState};
