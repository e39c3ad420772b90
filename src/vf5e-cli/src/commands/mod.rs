//! Command handlers for the vf5e CLI

pub mod categories;
pub mod pipeline;
