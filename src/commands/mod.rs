//! Command implementations for license-collect

pub mod collect;
pub mod completions;
pub mod version;
