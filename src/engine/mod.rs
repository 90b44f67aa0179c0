//! Engine module: digest computation, file hashing and the CLI front end

pub mod arg_parser;
pub mod digest;
pub mod handlers;
pub mod hashing;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use digest::{DigestComputer, digest_bytes};
pub use handlers::handle_run;
pub use hashing::hash_file;
pub use progress::ProgressReporter;
pub use tools::{canonicalize_root, privilege_gate, running_as_root};
