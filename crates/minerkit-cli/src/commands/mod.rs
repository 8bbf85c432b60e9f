//! Command implementations

pub mod algorithms;
pub mod check;
pub mod devices;
pub mod launch;
