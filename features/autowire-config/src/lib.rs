//! Autowire Config provides a registry of configs that can be injected in the rest of the
//! application.
//!
//! Autowire Config is split into two major parts:
//! 1. ConfigProvider: Used to create the registry of all configs
//! 2. Config<T>: A wrapper type to be able to resolve and retrieve configs
//!
//! # Examples
//!
//! ```rust
//! use autowire_config::provider::ConfigProvider;
//!
//! struct AppConfig {
//!     host: String,
//!     port: u16,
//! }
//!
//! fn setup_config() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config_provider = ConfigProvider::default();
//!     config_provider.add_config(AppConfig {
//!         host: "localhost".to_string(),
//!         port: 8080_u16,
//!     })?;
//!
//!     let retrieved_config = config_provider.require_config::<AppConfig>()?;
//!     assert_eq!(retrieved_config.host, "localhost");
//!     assert_eq!(retrieved_config.port, 8080);
//!     Ok(())
//! }
//! # setup_config().unwrap();
//! ```
//!
//! Autowire Config consists of the following components:
//!
//! 1. Config - for injecting configs as dependencies
//! 2. Provider - for creating a registry of configs and installing it into a specification
//! 3. Errors - for config errors

pub mod config;
pub mod errors;
pub mod provider;
