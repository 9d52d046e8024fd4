//! Upstream recording record schema
//!
//! This module defines the reader-agnostic record shape produced by bag-file
//! deserialization and the adapter that filters one state topic out of a
//! day's records into an event table.

mod record;
mod adapter;

pub use record::*;
pub use adapter::*;
