//! Generic ODBC driver.

mod descriptor;

pub use descriptor::OdbcDescriptor;
