//! MySQL/MariaDB driver.
//!
//! - [`MysqlDescriptor`]: dialect capabilities and SQLx connection options
//!
//! # Feature Flag
//!
//! This module is only available when the `mysql` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! dao-criteria = { version = "0.3", features = ["mysql"] }
//! ```
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+ (spatial functions need 5.7)
//! - MariaDB 10.2+

mod descriptor;

pub use descriptor::MysqlDescriptor;
