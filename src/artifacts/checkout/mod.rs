//! Checkout planning
//!
//! Switching the working directory from one snapshot to another is planned in full (every
//! file to delete or write, with its content already loaded) before anything is touched, so
//! obstructions and missing objects are reported with the working directory still intact.

pub mod migration;
