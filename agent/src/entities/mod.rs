pub mod binary_sensor;

pub const DOMAIN: &str = "catgenie";
pub const MANUFACTURER: &str = "PetNovations Ltd.";
pub const MODEL: &str = "VXHCATGENIE";
