pub mod config;
pub mod drivehash_toml;
pub mod logger;

pub use config::*;
pub use drivehash_toml::{apply_file_to_opts, load_drivehash_toml};
pub use logger::setup_logging;
