//! Vendor API models
//!
//! Request and response bodies exchanged with the CatGenie (PetNovations)
//! cloud and the SwitchBot cloud.

pub mod models;
