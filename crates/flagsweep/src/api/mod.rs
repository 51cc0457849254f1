//! Client for the flag service REST API.
//!
//! Two logical operations back the sweep: paginated flag enumeration and
//! the single-flag custom-property patch, plus a single-flag lookup used
//! to pick `add` vs `replace` semantics.

pub mod client;
pub mod error;
pub mod pagination;
pub mod types;

pub use client::{DEFAULT_HOST, FlagsClient};
pub use error::ApiError;
pub use pagination::{EnumerationError, PAGE_SIZE};
pub use types::{FlagPage, FlagRecord, PatchOp, PatchOperation, PatchRequest, PropertyValue};
