pub mod entry;
pub mod options;
pub mod run;
pub mod state;
