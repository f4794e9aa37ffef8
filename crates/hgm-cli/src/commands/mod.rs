//! CLI command implementations.

pub mod common;
pub mod excite;
pub mod identify;
pub mod info;
pub mod simulate;
