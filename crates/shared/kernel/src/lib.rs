//! Kernel utilities shared across slices.
//! Keep this crate lightweight; today it owns layered configuration loading.
//!
//! ## Config loading
//! ```rust,ignore
//! use evroute_kernel::config::load_config;
//! use evroute_kernel::domain::config::EvrouteConfig;
//!
//! let cfg: EvrouteConfig = load_config(Some("config/evroute.toml")).unwrap();
//! ```
pub mod config;

pub use evroute_domain as domain;
