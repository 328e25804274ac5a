//! Library surface of the recoder CLI: logging bootstrap and the
//! protocol catalog, shared with the binary and its tests.

pub mod config;
pub mod logging;
