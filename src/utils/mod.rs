//! Utility modules for the documentation publisher.

pub mod exec;
pub mod git;
pub mod path;
pub mod plural;
