//! CLI command implementations.

pub(crate) mod aggregate;
pub(crate) mod download;
pub(crate) mod info;
pub(crate) mod query;
pub(crate) mod sync;
