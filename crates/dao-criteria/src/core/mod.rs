//! Core abstractions shared by expressions, the SQL layer and the descriptors.
//!
//! - [`value`]: literal values carried by expressions and bound as parameters
//! - [`geometry`]: opaque geometry payload for spatial predicates
//! - [`mapping`]: class mapping metadata and the registry handing out [`MappingId`]s
//! - [`identifier`]: validation for identifiers spliced into SQL text
//! - [`traits`]: the [`ConnectionDescriptor`] capability trait
//! - [`binding`]: `?` placeholder rewriting for parameter binding
//! - [`transaction`]: transaction handles
//!
//! # Architecture
//!
//! Everything engine-specific lives behind [`ConnectionDescriptor`], implemented
//! in the `drivers` module. Adding an engine means adding one descriptor; the
//! expression model and the SQL layer stay untouched.

pub mod binding;
pub mod geometry;
pub mod identifier;
pub mod mapping;
pub mod traits;
pub mod transaction;
pub mod value;

pub use geometry::Geometry;
pub use mapping::{ClassMapping, MappingId, MappingRegistry};
pub use traits::{BoundCommand, ConnectionDescriptor, NativeConnection};
pub use transaction::{Transaction, TransactionStatements};
pub use value::Value;
