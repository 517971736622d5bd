//! Shared foundational types used across the Kiln architecture tools.
//!
//! Provides content hashing for loaded architecture files and the
//! [`InternalError`] type used when an invariant between processing stages
//! is broken.

#![warn(missing_docs)]

pub mod hash;
pub mod result;

pub use hash::ContentHash;
pub use result::{InternalError, KilnResult};
