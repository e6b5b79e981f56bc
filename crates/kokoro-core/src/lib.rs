pub mod config;
pub mod error;
pub mod provider;
pub mod service;
pub mod store;
pub mod types;
pub mod util;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
