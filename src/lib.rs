pub mod analysis;
pub mod config;
pub mod loader;
pub mod output;
pub mod store;
