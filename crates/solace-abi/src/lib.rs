//! ABI generation.
//!
//! Turns the function-like entries of a [`solace_ir::Contract`] into
//! JSON-ready [`Method`] descriptors.

pub mod builder;
pub mod errors;
pub mod method;

pub use builder::Builder;
pub use errors::{AbiError, AbiErrorKind, AbiResult};
pub use method::{Method, MethodIO};
