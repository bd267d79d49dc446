/// Context module for core-full
pub mod config;

pub use config::{ProjectConfig, discover_packages, load_options};
