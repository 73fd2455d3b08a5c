pub mod config;
pub mod errors;
pub mod fallback;
pub mod kernel;
pub mod retry;
pub mod types;
