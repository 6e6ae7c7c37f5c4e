//! Credentials for the vendor clouds

pub mod access_token;
pub mod switchbot_sign;
pub mod token_mngr;
