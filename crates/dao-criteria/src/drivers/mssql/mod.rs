//! Microsoft SQL Server driver.
//!
//! - [`MssqlDescriptor`]: dialect capabilities and `tiberius` connection config

mod descriptor;

pub use descriptor::MssqlDescriptor;
