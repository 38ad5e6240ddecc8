//! Feature aggregation and result types

pub mod result;
